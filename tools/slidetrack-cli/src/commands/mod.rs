pub mod config;
pub mod locate;
pub mod solve;
pub mod synth;
pub mod tracks;

/// Serialize `value` to stdout as JSON.
pub fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}
