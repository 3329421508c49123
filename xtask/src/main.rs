use camino::{Utf8Path, Utf8PathBuf};
use rayon::prelude::*;
use std::fs;
use tacplot::parse::{PlotEntry, parse_document};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: cargo xtask <command>");
        eprintln!("Commands:");
        eprintln!("  gallery [OUT_DIR]    Render every shape in tests/data/*.plot to SVG");
        std::process::exit(1);
    }

    match args[1].as_str() {
        "gallery" => {
            let out_dir = args.get(2).map(Utf8PathBuf::from);
            gallery(out_dir);
        }
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            std::process::exit(1);
        }
    }
}

/// One rendered card of the gallery.
struct Card {
    title: String,
    source: String,
    svg: Result<String, String>,
}

fn gallery(out_dir: Option<Utf8PathBuf>) {
    let manifest_dir = Utf8Path::new(env!("CARGO_MANIFEST_DIR"));
    let root = manifest_dir.parent().unwrap_or(manifest_dir);
    let data_dir = root.join("tests/data");
    let out_dir = out_dir.unwrap_or_else(|| root.join("target/gallery"));
    fs::create_dir_all(&out_dir).expect("Failed to create output directory");

    let mut files: Vec<Utf8PathBuf> = fs::read_dir(&data_dir)
        .expect("Failed to read tests/data")
        .filter_map(|e| e.ok())
        .filter_map(|e| Utf8PathBuf::from_path_buf(e.path()).ok())
        .filter(|p| p.extension() == Some("plot"))
        .collect();
    files.sort();

    // (file stem, entry index, entry source line)
    let mut jobs: Vec<(String, usize, String)> = Vec::new();
    for path in &files {
        let stem = path.file_stem().unwrap_or("plot").to_string();
        eprintln!("Reading {}...", path);
        let source = fs::read_to_string(path).expect("Failed to read plot file");
        match parse_document(path.as_str(), &source) {
            Ok(entries) => {
                for (i, entry) in entries.iter().enumerate() {
                    jobs.push((stem.clone(), i, entry_source(entry)));
                }
            }
            Err(e) => eprintln!("Skipping {}: {:?}", path, miette::Report::new(e)),
        }
    }

    let cards: Vec<Card> = jobs
        .par_iter()
        .map(|(stem, i, source)| {
            let svg = tacplot::plot(source).map_err(|e| format!("{e:?}"));
            if let Ok(svg) = &svg {
                let file = out_dir.join(format!("{stem}-{i:02}.svg"));
                fs::write(&file, svg).expect("Failed to write SVG");
            }
            Card {
                title: format!("{stem} #{i}"),
                source: source.clone(),
                svg,
            }
        })
        .collect();

    let failed = cards.iter().filter(|c| c.svg.is_err()).count();
    let index = out_dir.join("index.html");
    fs::write(&index, render_index(&cards)).expect("Failed to write HTML");
    println!(
        "Rendered {} shapes ({} failed) to {}",
        cards.len() - failed,
        failed,
        index
    );
}

fn entry_source(entry: &PlotEntry) -> String {
    format!("{} {}", entry.kind, entry.anchors)
}

fn render_index(cards: &[Card]) -> String {
    let mut html = String::from(
        r#"<!DOCTYPE html>
<html><head><meta charset="utf-8"><title>tacplot gallery</title>
<style>
body { font-family: sans-serif; background: #f4f4f4; }
.grid { display: flex; flex-wrap: wrap; gap: 16px; }
.card { background: white; padding: 8px; width: 420px; }
.card svg { width: 400px; height: auto; }
.error { color: #b00; white-space: pre-wrap; font-family: monospace; }
.source { font-family: monospace; font-size: 12px; word-break: break-all; }
</style></head><body>
<div class="grid">
"#,
    );
    for card in cards {
        let body = match &card.svg {
            Ok(svg) => svg.clone(),
            Err(e) => format!(r#"<div class="error">{}</div>"#, html_escape(e)),
        };
        html.push_str(&format!(
            r#"<div class="card"><h3>{}</h3>{}<div class="source">{}</div></div>
"#,
            html_escape(&card.title),
            body,
            html_escape(&card.source),
        ));
    }
    html.push_str("</div>\n</body></html>");
    html
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
