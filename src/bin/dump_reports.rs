/// Clean every chapter file in a directory and write per-chapter diagnostics.
///
/// Usage:
///   cargo run --bin dump-reports -- <html-dir> <out-dir> [strictness]
///
/// For each `.html`/`.xhtml` file writes `<name>.cleaned.txt` and
/// `<name>.cleaning_report.json` into `<out-dir>`.
/// Errors (stderr): {"file": "...", "error": "..."}
/// Summary (stderr): "Done: N ok, M errors"
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use chapter_clean::{clean_chapter, Strictness};

fn is_chapter_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|x| x.eq_ignore_ascii_case("html") || x.eq_ignore_ascii_case("xhtml"))
}

fn dump_one(path: &Path, out_dir: &Path, strictness: Strictness) -> Result<(), String> {
    let raw = fs::read(path).map_err(|e| e.to_string())?;
    // Undecodable bytes become U+FFFD rather than failing the chapter.
    let html = String::from_utf8_lossy(&raw);

    let chapter = clean_chapter(&html, strictness);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or("file has no name")?;

    fs::write(out_dir.join(format!("{stem}.cleaned.txt")), &chapter.text)
        .map_err(|e| e.to_string())?;
    let json = chapter.report.to_json().map_err(|e| e.to_string())?;
    fs::write(out_dir.join(format!("{stem}.cleaning_report.json")), json)
        .map_err(|e| e.to_string())?;
    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: dump-reports <html-dir> <out-dir> [conservative|balanced|aggressive]");
        process::exit(1);
    }
    let html_dir = Path::new(&args[1]);
    let out_dir = Path::new(&args[2]);
    let strictness = match args.get(3).map(|s| s.parse::<Strictness>()) {
        None => Strictness::default(),
        Some(Ok(s)) => s,
        Some(Err(e)) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    let mut entries: Vec<PathBuf> = match fs::read_dir(html_dir) {
        Ok(dir) => dir
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| is_chapter_file(p))
            .collect(),
        Err(e) => {
            eprintln!("cannot read {}: {e}", html_dir.display());
            process::exit(1);
        }
    };
    entries.sort();

    if let Err(e) = fs::create_dir_all(out_dir) {
        eprintln!("cannot create {}: {e}", out_dir.display());
        process::exit(1);
    }

    let mut ok = 0usize;
    let mut errors = 0usize;

    for path in &entries {
        match dump_one(path, out_dir, strictness) {
            Ok(()) => ok += 1,
            Err(error) => {
                let filename = path.file_name().map(|f| f.to_string_lossy()).unwrap_or_default();
                eprintln!("{}", serde_json::json!({ "file": filename, "error": error }));
                errors += 1;
            }
        }
    }

    eprintln!("Done: {ok} ok, {errors} errors  (total {})", ok + errors);
}
