use std::path::Path;

use super::*;

#[test]
fn defaults_produce_valid_settings() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.server.addr.to_string(), "127.0.0.1:3000");
    assert_eq!(settings.server.max_body_bytes.get(), DEFAULT_MAX_BODY_BYTES);
    assert_eq!(settings.server.graceful_shutdown, Duration::from_secs(30));
    assert_eq!(settings.logging.level, LevelFilter::INFO);
    assert_eq!(settings.logging.format, LogFormat::Compact);
    assert!(settings.render.sanitize);
    assert_eq!(settings.render.embed_default_height.get(), 400);
    assert_eq!(settings.contact.message_max_chars, DEFAULT_MESSAGE_MAX_CHARS);
    assert_eq!(settings.contact.inbox_capacity.get(), DEFAULT_INBOX_CAPACITY);
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(4000);
    raw.logging.level = Some("info".to_string());

    let overrides = ServeOverrides {
        server_port: Some(4321),
        log_level: Some("debug".to_string()),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn render_overrides_apply_to_render_settings() {
    let mut raw = RawSettings::default();
    raw.render.sanitize = Some(true);

    raw.apply_render_overrides(&RenderOverrides {
        sanitize: Some(false),
        embed_default_height: Some(315),
    });
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(!settings.render.sanitize);
    assert_eq!(settings.render.embed_default_height.get(), 315);
}

#[test]
fn zero_values_are_rejected() {
    let mut raw = RawSettings::default();
    raw.render.embed_default_height = Some(0);
    let err = Settings::from_raw(raw).expect_err("zero height rejected");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "render.embed_default_height",
            ..
        }
    ));

    let mut raw = RawSettings::default();
    raw.server.port = Some(0);
    assert!(Settings::from_raw(raw).is_err());

    let mut raw = RawSettings::default();
    raw.contact.inbox_capacity = Some(0);
    assert!(Settings::from_raw(raw).is_err());
}

#[test]
fn message_limit_must_leave_room_for_minimum() {
    let mut raw = RawSettings::default();
    raw.contact.message_max_chars = Some(3);

    let err = Settings::from_raw(raw).expect_err("limit below minimum");
    assert!(err.to_string().contains("contact.message_max_chars"));
}

#[test]
fn unparsable_log_level_is_reported() {
    let mut raw = RawSettings::default();
    raw.logging.level = Some("chatty".to_string());

    let err = Settings::from_raw(raw).expect_err("bad level");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "logging.level",
            ..
        }
    ));
}

#[test]
fn invalid_host_is_reported() {
    let mut raw = RawSettings::default();
    raw.server.host = Some("not a host".to_string());

    assert!(matches!(
        Settings::from_raw(raw),
        Err(LoadError::Invalid {
            key: "server.addr",
            ..
        })
    ));
}

#[test]
fn default_to_serve_command() {
    let args = CliArgs::parse_from(["folio"]);
    let command = args
        .command
        .unwrap_or(Command::Serve(Box::<ServeArgs>::default()));
    assert!(matches!(command, Command::Serve(_)));
}

#[test]
fn parse_serve_arguments() {
    let args = CliArgs::parse_from([
        "folio",
        "serve",
        "--server-port",
        "8080",
        "--log-json",
        "yes",
        "--render-sanitize",
        "off",
    ]);

    match args.command.expect("serve command") {
        Command::Serve(serve) => {
            assert_eq!(serve.overrides.server_port, Some(8080));
            assert_eq!(serve.overrides.log_json, Some(true));
            assert_eq!(serve.overrides.render.sanitize, Some(false));
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn parse_render_arguments() {
    let args = CliArgs::parse_from([
        "folio",
        "render",
        "--json",
        "--render-embed-default-height",
        "500",
        "/tmp/post.json",
    ]);

    match args.command.expect("render command") {
        Command::Render(render) => {
            assert!(render.json);
            assert!(!render.raw);
            assert_eq!(render.overrides.embed_default_height, Some(500));
            assert_eq!(render.file, Path::new("/tmp/post.json"));
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn raw_and_json_output_conflict() {
    let result = CliArgs::try_parse_from(["folio", "render", "--raw", "--json", "/tmp/post.json"]);
    assert!(result.is_err());
}

#[test]
fn config_file_is_layered_under_cli_overrides() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("folio.toml");
    std::fs::write(
        &path,
        "[server]\nport = 4100\n\n[render]\nsanitize = false\nembed_default_height = 360\n",
    )
    .expect("write config");

    let cli = CliArgs::parse_from([
        "folio",
        "--config-file",
        path.to_str().expect("utf8 path"),
        "serve",
        "--server-port",
        "4200",
    ]);
    let settings = load(&cli).expect("settings load");

    assert_eq!(settings.server.addr.port(), 4200);
    assert!(!settings.render.sanitize);
    assert_eq!(settings.render.embed_default_height.get(), 360);
}

#[test]
fn missing_explicit_config_file_is_an_error() {
    let cli = CliArgs::parse_from(["folio", "--config-file", "/nonexistent/folio.toml"]);
    assert!(matches!(load(&cli), Err(LoadError::Build(_))));
}
