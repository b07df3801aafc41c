use anyhow::Result;
use clap::CommandFactory;
use std::io::Write;

use navilink_bridge::options::Options;

const CARGO_PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {} {}] {}",
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.level(),
                record.module_path().unwrap_or(""),
                record.args()
            )
        })
        .write_style(env_logger::WriteStyle::Never)
        .init();

    println!("--------------");
    println!("NaviLink Bridge V{CARGO_PKG_VERSION}");
    println!("--------------");
    println!();

    let options = Options::new();
    if !options.has_action() {
        Options::command().print_help()?;
        return Ok(());
    }

    navilink_bridge::app(options).await
}
