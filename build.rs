use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use syntect::dumps::dump_to_uncompressed_file;
use syntect::highlighting::ThemeSet;
use syntect::html::{ClassStyle, css_for_theme_with_class_style};
use two_face::syntax;

const CODE_THEME: &str = "base16-ocean.light";

fn main() {
    prepare_highlighting_assets().expect("failed to prepare syntax highlighting assets");
    println!("cargo:rerun-if-changed=build.rs");
}

fn prepare_highlighting_assets() -> Result<(), String> {
    let out_dir = PathBuf::from(env::var("OUT_DIR").map_err(|err| err.to_string())?);
    write_syntax_pack(&out_dir)?;
    write_theme_css(&out_dir)
}

fn write_theme_css(out_dir: &Path) -> Result<(), String> {
    let theme_set = ThemeSet::load_defaults();
    let theme = theme_set
        .themes
        .get(CODE_THEME)
        .ok_or_else(|| format!("theme `{CODE_THEME}` not found"))?;

    let css = css_for_theme_with_class_style(theme, ClassStyle::SpacedPrefixed { prefix: "syntax-" })
        .map_err(|err| err.to_string())?;

    let css_path = out_dir.join("code-theme.css");
    let mut contents = String::with_capacity(css.len() + 80);
    contents.push_str("/* Syntect theme (");
    contents.push_str(CODE_THEME);
    contents.push_str("), generated at build time */\n");
    contents.push_str(&css);

    fs::write(&css_path, contents)
        .map_err(|err| format!("failed to write {}: {err}", css_path.display()))?;

    println!("cargo:rustc-env=CODE_THEME_CSS_FILE={}", css_path.display());
    Ok(())
}

fn write_syntax_pack(out_dir: &Path) -> Result<(), String> {
    let syntax_set = syntax::extra_newlines();
    let pack_path = out_dir.join("syntaxes.packdump");
    dump_to_uncompressed_file(&syntax_set, &pack_path)
        .map_err(|err| format!("failed to encode syntax set: {err}"))?;

    println!("cargo:rustc-env=SYNTAX_PACK_FILE={}", pack_path.display());

    Ok(())
}
