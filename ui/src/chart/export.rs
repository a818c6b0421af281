use dioxus::prelude::*;
use tracing::{info, warn};

use crate::chart::svg::render_svg;
use crate::core::config::{
    ChartConfig, CSV_FILENAME, CSV_MIME, JSON_FILENAME, JSON_MIME, PNG_FILENAME, PNG_MIME,
};
use crate::core::derive::DerivedRow;
use crate::core::error::ChartError;
use crate::core::platform;
use crate::core::RenderPlan;
use crate::t;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportKind {
    Png,
    Csv,
    Json,
}

impl ExportKind {
    async fn perform(self, plan: RenderPlan, config: ChartConfig) -> Result<String, ChartError> {
        match self {
            ExportKind::Png => perform_png_export(&plan, &config).await,
            ExportKind::Csv => perform_csv_export(&plan.rows).await,
            ExportKind::Json => perform_json_export(&plan.rows).await,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
enum ExportStatus {
    Idle,
    Working(ExportKind),
    Done(String),
    Error(String),
}

impl ExportStatus {
    /// Status to show once a different chart replaces the exported one.
    /// Finished results belong to the old chart; an export still running keeps reporting.
    fn for_new_chart(&self) -> ExportStatus {
        match self {
            ExportStatus::Working(kind) => ExportStatus::Working(*kind),
            ExportStatus::Idle | ExportStatus::Done(_) | ExportStatus::Error(_) => ExportStatus::Idle,
        }
    }
}

#[component]
pub fn ChartExportPanel(plan: RenderPlan, config: ChartConfig) -> Element {
    let mut status = use_signal(|| ExportStatus::Idle);
    let busy = use_signal(|| false);

    use_effect(use_reactive((&plan,), move |(_plan,)| {
        let next = status.peek().for_new_chart();
        if *status.peek() != next {
            status.set(next);
        }
    }));

    let feedback = match &status() {
        ExportStatus::Idle => None,
        ExportStatus::Working(kind) => {
            let label = match kind {
                ExportKind::Png => t!("export-working-png"),
                ExportKind::Csv => t!("export-working-csv"),
                ExportKind::Json => t!("export-working-json"),
            };
            Some(("chart-card__meta".to_string(), format!("{label}…")))
        }
        ExportStatus::Done(message) => Some((
            "chart-card__meta chart-card__meta--success".to_string(),
            format!("✅ {message}"),
        )),
        ExportStatus::Error(err) => Some((
            "chart-card__meta chart-card__meta--error".to_string(),
            format!("⚠️ {err}"),
        )),
    };

    let png_plan = plan.clone();
    let csv_plan = plan.clone();
    let json_plan = plan;

    rsx! {
        section { class: "chart-card chart-export",
            div { class: "chart-card__header",
                h2 { {t!("export-title")} }
            }
            p { {t!("export-intro")} }

            div { class: "chart-export__actions",
                button {
                    r#type: "button",
                    class: "button button--primary",
                    disabled: busy(),
                    onclick: move |_| start_export(ExportKind::Png, png_plan.clone(), config, status, busy),
                    {t!("export-png")}
                }
                button {
                    r#type: "button",
                    class: "button",
                    disabled: busy(),
                    onclick: move |_| start_export(ExportKind::Csv, csv_plan.clone(), config, status, busy),
                    {t!("export-csv")}
                }
                button {
                    r#type: "button",
                    class: "button button--ghost",
                    disabled: busy(),
                    onclick: move |_| start_export(ExportKind::Json, json_plan.clone(), config, status, busy),
                    {t!("export-json")}
                }
            }

            if let Some((class_name, message)) = feedback {
                p { class: "{class_name}", "{message}" }
            }
        }
    }
}

fn start_export(
    kind: ExportKind,
    plan: RenderPlan,
    config: ChartConfig,
    mut status: Signal<ExportStatus>,
    mut busy: Signal<bool>,
) {
    if busy() {
        return;
    }
    busy.set(true);
    status.set(ExportStatus::Working(kind));

    platform::spawn_future(async move {
        match kind.perform(plan, config).await {
            Ok(message) => {
                info!(?kind, "export delivered");
                status.set(ExportStatus::Done(message));
            }
            Err(err) => {
                warn!(?kind, %err, "export failed");
                status.set(ExportStatus::Error(err.to_string()));
            }
        }
        busy.set(false);
    });
}

async fn perform_png_export(plan: &RenderPlan, config: &ChartConfig) -> Result<String, ChartError> {
    let svg = render_svg(plan, config);
    let png_bytes = build_png(&svg, &plan.title, config).await?;
    let delivery = download_bytes(PNG_FILENAME, PNG_MIME, png_bytes).await?;
    Ok(match delivery {
        Some(path) => format!("Chart saved to {path}"),
        None => "PNG download started".to_string(),
    })
}

async fn perform_csv_export(rows: &[DerivedRow]) -> Result<String, ChartError> {
    let csv = build_csv(rows);
    let delivery = download_bytes(CSV_FILENAME, CSV_MIME, csv.into_bytes()).await?;
    Ok(match delivery {
        Some(path) => format!("CSV saved to {path}"),
        None => "CSV download started".to_string(),
    })
}

async fn perform_json_export(rows: &[DerivedRow]) -> Result<String, ChartError> {
    let json = serde_json::to_string_pretty(rows).map_err(|err| ChartError::Export(err.to_string()))?;
    copy_to_clipboard(json.clone()).await?;
    let delivery = download_bytes(JSON_FILENAME, JSON_MIME, json.into_bytes()).await?;
    Ok(match delivery {
        Some(path) => format!("JSON copied and saved to {path}"),
        None => "JSON copied to clipboard and download started".to_string(),
    })
}

pub fn build_csv(rows: &[DerivedRow]) -> String {
    let mut lines: Vec<Vec<String>> = Vec::with_capacity(rows.len() + 1);
    lines.push(
        [
            "kpi",
            "average_score",
            "green",
            "amber",
            "red",
            "total",
            "green_pct",
            "amber_pct",
            "red_pct",
            "score_bucket",
        ]
        .into_iter()
        .map(String::from)
        .collect(),
    );

    for row in rows {
        let mut line = vec![row.label.clone(), row.average_score.to_string()];
        line.extend(row.counts.iter().map(u64::to_string));
        line.push(row.total.to_string());
        line.extend(row.percentages.iter().map(|pct| format!("{pct:.2}")));
        line.push(row.bucket.name().to_string());
        lines.push(line);
    }

    let mut csv = String::new();
    for line in lines {
        let joined = line
            .into_iter()
            .map(|field| escape_csv(&field))
            .collect::<Vec<_>>()
            .join(",");
        csv.push_str(&joined);
        csv.push('\n');
    }

    csv
}

fn escape_csv(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }

    let needs_quotes = value.contains(',') || value.contains('"') || value.contains('\n');
    if needs_quotes {
        let escaped = value.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
    }
}

async fn copy_to_clipboard(payload: String) -> Result<(), ChartError> {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;

        let export_err = |msg: &str| ChartError::Export(msg.to_string());
        let window = web_sys::window().ok_or_else(|| export_err("window unavailable"))?;
        let document = window
            .document()
            .ok_or_else(|| export_err("document unavailable"))?;
        let body = document.body().ok_or_else(|| export_err("missing body"))?;

        let textarea = document
            .create_element("textarea")
            .map_err(|_| export_err("Unable to create textarea"))?
            .dyn_into::<web_sys::HtmlTextAreaElement>()
            .map_err(|_| export_err("Textarea cast failed"))?;
        textarea.set_value(&payload);
        let style = textarea.style();
        style.set_property("position", "fixed").ok();
        style.set_property("top", "0").ok();
        style.set_property("left", "0").ok();
        style.set_property("opacity", "0").ok();

        body.append_child(&textarea).ok();
        textarea.select();
        let html_document = document
            .dyn_into::<web_sys::HtmlDocument>()
            .map_err(|_| export_err("Clipboard unavailable"))?;
        if !html_document.exec_command("copy").unwrap_or(false) {
            textarea.remove();
            return Err(export_err("Clipboard copy blocked"));
        }
        textarea.remove();
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        use arboard::Clipboard;

        let mut clipboard = Clipboard::new().map_err(|err| ChartError::Export(err.to_string()))?;
        clipboard
            .set_text(payload)
            .map_err(|err| ChartError::Export(err.to_string()))
    }
}

async fn download_bytes(
    filename: &str,
    mime: &str,
    bytes: Vec<u8>,
) -> Result<Option<String>, ChartError> {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;
        use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

        let export_err = |msg: &str| ChartError::Export(msg.to_string());
        let array = js_sys::Uint8Array::from(bytes.as_slice());
        let parts = js_sys::Array::new();
        parts.push(&array.buffer());

        let opts = BlobPropertyBag::new();
        opts.set_type(mime);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &opts)
            .map_err(|_| export_err("Failed to create blob"))?;
        let url = Url::create_object_url_with_blob(&blob)
            .map_err(|_| export_err("Unable to create download"))?;

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| export_err("Document unavailable"))?;
        let anchor: HtmlAnchorElement = document
            .create_element("a")
            .map_err(|_| export_err("Unable to create anchor"))?
            .dyn_into()
            .map_err(|_| export_err("Anchor cast failed"))?;
        anchor.set_href(&url);
        anchor.set_download(filename);
        anchor.style().set_property("display", "none").ok();

        document
            .body()
            .ok_or_else(|| export_err("Missing body"))?
            .append_child(&anchor)
            .ok();
        anchor.click();
        anchor.remove();
        Url::revoke_object_url(&url).ok();

        Ok(None)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::fs;
        use std::io::Write;

        let _ = mime;
        let dir = desktop_export_dir()?;
        let io_err = |err: std::io::Error| ChartError::Export(err.to_string());
        fs::create_dir_all(&dir).map_err(io_err)?;
        let path = dir.join(filename);
        let mut file = fs::File::create(&path).map_err(io_err)?;
        file.write_all(&bytes).map_err(io_err)?;
        Ok(Some(path.to_string_lossy().to_string()))
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn desktop_export_dir() -> Result<std::path::PathBuf, ChartError> {
    let dirs = directories::ProjectDirs::from("com", "KpiBoard", "KpiBoard")
        .ok_or_else(|| ChartError::Export("Unable to determine export directory".into()))?;
    Ok(dirs.data_dir().join("exports"))
}

async fn build_png(svg: &str, title: &str, config: &ChartConfig) -> Result<Vec<u8>, ChartError> {
    #[cfg(target_arch = "wasm32")]
    {
        let _ = title;
        build_png_web(svg, config).await
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = config;
        rasterize_svg(svg, title)
    }
}

#[cfg(target_arch = "wasm32")]
async fn build_png_web(svg: &str, config: &ChartConfig) -> Result<Vec<u8>, ChartError> {
    use base64::Engine;
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{
        Blob, BlobPropertyBag, CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, Url,
    };

    let render_err = |msg: &str| ChartError::Render(msg.to_string());

    let opts = BlobPropertyBag::new();
    opts.set_type("image/svg+xml");
    let parts = js_sys::Array::new();
    parts.push(&JsValue::from_str(svg));
    let blob = Blob::new_with_str_sequence_and_options(&parts, &opts)
        .map_err(|_| render_err("Unable to build SVG blob"))?;
    let url = Url::create_object_url_with_blob(&blob)
        .map_err(|_| render_err("Unable to create SVG URL"))?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| render_err("Document unavailable"))?;

    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|_| render_err("Unable to create canvas"))?
        .dyn_into()
        .map_err(|_| render_err("Canvas cast failed"))?;
    canvas.set_width(config.width);
    canvas.set_height(config.height);

    let context: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(|_| render_err("Canvas context unavailable"))?
        .ok_or_else(|| render_err("Canvas context missing"))?
        .dyn_into()
        .map_err(|_| render_err("Context cast failed"))?;

    let image = HtmlImageElement::new().map_err(|_| render_err("Unable to create image"))?;
    image.set_src(&url);
    JsFuture::from(image.decode())
        .await
        .map_err(|_| render_err("Image decode failed"))?;

    context
        .draw_image_with_html_image_element(&image, 0.0, 0.0)
        .map_err(|_| render_err("Unable to draw image"))?;

    let data_url = canvas
        .to_data_url_with_type("image/png")
        .map_err(|_| render_err("Unable to serialise canvas"))?;
    Url::revoke_object_url(&url).ok();

    let payload = data_url
        .split(',')
        .nth(1)
        .ok_or_else(|| render_err("Malformed data URL"))?;
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|_| render_err("PNG decode failed"))
}

/// Rasterize chart SVG into PNG bytes, embedding `title` as an iTXt chunk.
#[cfg(not(target_arch = "wasm32"))]
pub fn rasterize_svg(svg: &str, title: &str) -> Result<Vec<u8>, ChartError> {
    use std::sync::Arc;

    use crate::chart::fonts::EMBEDDED_FONT;

    let render_err = |err: String| ChartError::Render(err);

    let mut fontdb = usvg::fontdb::Database::new();
    fontdb.load_system_fonts();
    if let Some(bytes) = EMBEDDED_FONT {
        fontdb.load_font_data(bytes.to_vec());
    }
    tracing::debug!("Loaded {} font faces for PNG export", fontdb.len());

    let mut options = usvg::Options::default();
    options.fontdb = Arc::new(fontdb);

    let tree = usvg::Tree::from_str(svg, &options).map_err(|err| render_err(err.to_string()))?;
    let size = tree.size().to_int_size();
    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| render_err("Failed to create pixmap".into()))?;
    pixmap.fill(tiny_skia::Color::WHITE);
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    encode_png(&pixmap, title)
}

#[cfg(not(target_arch = "wasm32"))]
fn encode_png(pixmap: &tiny_skia::Pixmap, title: &str) -> Result<Vec<u8>, ChartError> {
    let render_err = |err: png::EncodingError| ChartError::Render(err.to_string());

    let mut rgba = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let color = pixel.demultiply();
        rgba.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
    }

    let mut buffer = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buffer, pixmap.width(), pixmap.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder
            .add_itxt_chunk("Title".to_string(), title.to_string())
            .map_err(render_err)?;
        encoder
            .write_header()
            .map_err(render_err)?
            .write_image_data(&rgba)
            .map_err(render_err)?;
    }

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::plan::ChartOptions;
    use crate::core::{generate, KpiInput};

    fn plan() -> RenderPlan {
        let input = KpiInput {
            labels: "Uptime\nPatching, monthly".into(),
            scores: "85%\n58".into(),
            green: "4\n0".into(),
            amber: "1\n0".into(),
            red: "0\n0".into(),
        };
        generate(&input, &ChartOptions::default(), &ChartConfig::default()).unwrap()
    }

    #[test]
    fn new_chart_clears_finished_export_feedback() {
        let done = ExportStatus::Done("Chart saved to kpi_chart.png".into());
        assert_eq!(done.for_new_chart(), ExportStatus::Idle);
        assert_eq!(ExportStatus::Error("disk full".into()).for_new_chart(), ExportStatus::Idle);
        assert_eq!(
            ExportStatus::Working(ExportKind::Png).for_new_chart(),
            ExportStatus::Working(ExportKind::Png)
        );
    }

    #[test]
    fn csv_has_header_and_one_line_per_row() {
        let csv = build_csv(&plan().rows);
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("kpi,average_score,green,amber,red,total"));
        assert_eq!(lines[1], "Uptime,85,4,1,0,5,80.00,20.00,0.00,High");
    }

    #[test]
    fn csv_quotes_labels_with_commas() {
        let csv = build_csv(&plan().rows);
        assert!(csv.contains("\"Patching, monthly\",58,0,0,0,0,0.00,0.00,0.00,Low"));
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv(""), "");
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn rasterized_chart_is_a_png_of_configured_size() {
        let config = ChartConfig {
            width: 640,
            height: 360,
            ..ChartConfig::default()
        };
        let svg = render_svg(&plan(), &config);
        let bytes = rasterize_svg(&svg, "KPI Chart").unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let decoder = png::Decoder::new(bytes.as_slice());
        let reader = decoder.read_info().unwrap();
        let info = reader.info();
        assert_eq!((info.width, info.height), (640, 360));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn labels_with_control_characters_still_rasterize() {
        let config = ChartConfig {
            width: 640,
            height: 360,
            ..ChartConfig::default()
        };
        let input = KpiInput {
            labels: "Net\u{0b}work\nOps".into(),
            scores: "70\n90".into(),
            green: "2\n3".into(),
            amber: "1\n0".into(),
            red: "0\n1".into(),
        };
        let plan = generate(&input, &ChartOptions::default(), &config).unwrap();
        let bytes = rasterize_svg(&render_svg(&plan, &config), &plan.title).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn malformed_svg_is_a_render_error() {
        let err = rasterize_svg("<svg", "x").unwrap_err();
        assert!(matches!(err, ChartError::Render(_)));
    }
}
