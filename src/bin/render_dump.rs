use std::{env, error::Error, fs, path::Path};

use folio::application::render::{RenderRequest, RenderService, RenderTarget, render_service};

const USAGE: &str = "usage: render_dump [--sanitize|--no-sanitize] <post|project|page> <document_json_path>";

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);

    let mut sanitize = true;
    let first = args.next().ok_or(USAGE)?;

    let (target_arg, path_arg) = match first.as_str() {
        "--sanitize" | "--no-sanitize" => {
            sanitize = first == "--sanitize";
            let target = args.next().ok_or(USAGE)?;
            let path = args.next().ok_or(USAGE)?;
            (target, path)
        }
        other => (other.to_string(), args.next().ok_or(USAGE)?),
    };

    if args.next().is_some() {
        return Err(USAGE.into());
    }

    let contents = fs::read_to_string(&path_arg)?;
    let value: serde_json::Value = serde_json::from_str(&contents)?;
    let slug = Path::new(&path_arg)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("fixture")
        .to_owned();

    let render_target = match target_arg.as_str() {
        "post" => RenderTarget::Post { slug },
        "project" => RenderTarget::Project { slug },
        "page" => RenderTarget::Page { slug },
        other => {
            eprintln!("unknown target '{other}', expected 'post', 'project' or 'page'");
            std::process::exit(2);
        }
    };

    let renderer = render_service();
    let request = RenderRequest::from_json(render_target, Some(&value));

    if sanitize {
        let output = renderer.render(&request)?;
        println!("{}", output.html);
    } else {
        println!("{}", renderer.render_unsanitized(&request));
    }
    Ok(())
}
