use std::env;
use std::fs;
use std::path::Path;

/// Claves que la app lee con option_env! (ver src/config.rs)
const TRACKED_KEYS: &[&str] = &[
    "RAFFLE_CONTRACT_ADDRESS",
    "DEFAULT_NETWORK",
    "DEFAULT_RPC_URL",
    "ENABLE_LOGGING",
    "LOG_LEVEL",
    "RECEIPT_POLL_INTERVAL_MS",
];

fn main() {
    let env_file = Path::new(".env");

    if env_file.exists() {
        println!("cargo:rerun-if-changed=.env");
        if let Ok(contents) = fs::read_to_string(env_file) {
            load_dotenv(&contents);
        }
    } else {
        println!("cargo:warning=No .env file found. Demo mode: raffles will use fixture data until RAFFLE_CONTRACT_ADDRESS is set.");
    }

    for key in TRACKED_KEYS {
        println!("cargo:rerun-if-env-changed={}", key);
    }
    println!("cargo:rerun-if-changed=build.rs");
}

/// Exporta cada KEY=VALUE del .env como variable de compilación,
/// sin pisar las que ya vienen del entorno
fn load_dotenv(contents: &str) {
    for line in contents.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim().trim_matches('"');

        if env::var(key).is_err() {
            println!("cargo:rustc-env={}={}", key, value);
        }
    }
}
