//! Compare two search result rankings with a file config and env overrides.
//!
//! Run with file values only:
//! - `cargo run --example compare_rankings`
//!
//! Run with env overrides on top:
//! - `RANKOVERLAP_PERSISTENCE=0.98 cargo run --example compare_rankings`

use std::path::Path;

use rankoverlap::prelude::*;

fn main() {
    let dir = std::env::temp_dir().join(format!("rankoverlap-example-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create temp dir");

    let config_path = dir.join("rbo.toml");
    std::fs::write(&config_path, sample_config_toml()).expect("write sample config");

    let file_config = load_config_file(&config_path);
    let effective = file_config.with_env_overrides();
    effective.validate().expect("effective config is valid");

    println!("config_file={}", config_path.display());
    print_config("from_file", &file_config);
    print_config("effective_after_env", &effective);

    let lexical = ["rrf-notes", "config-priority", "watch-mode", "index-format", "tui"];
    let semantic = [
        "config-priority",
        "rrf-notes",
        "embedding-cache",
        "watch-mode",
        "tui",
        "index-format",
        "rerank",
    ];

    let report = calculate_report(&lexical, &semantic, &effective).expect("compare rankings");
    println!(
        "rbo={:.6} truncated={:.6} depth={} overlap={} short_depth={} residual_weight={:.6}",
        report.score,
        report.truncated_score,
        report.depth,
        report.overlap,
        report.short_depth,
        report.residual_weight()
    );

    let _ = std::fs::remove_dir_all(&dir);
}

fn load_config_file(path: &Path) -> RboConfig {
    RboConfig::load(path).expect("load config file")
}

fn print_config(label: &str, config: &RboConfig) {
    println!(
        "{label}: persistence={:.3} both_empty={}",
        config.persistence,
        config.both_empty.as_str()
    );
}

const fn sample_config_toml() -> &'static str {
    r#"
persistence = 0.9
both_empty = "identical"
"#
}
