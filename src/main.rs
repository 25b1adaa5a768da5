//! Webcam frame server demo
//!
//! Run with: cargo run [OPTIONS] [BIND_ADDR]
//!
//! Examples:
//!   cargo run                                     # test pattern on 0.0.0.0:8080
//!   cargo run -- localhost:9090                   # custom bind address
//!   cargo run -- --quality 70 --width 320 --height 240
//!   cargo run --features camera-nokhwa -- --device 0
//!
//! Fetch frames:
//!   curl -o frame.jpg 'http://localhost:8080/video/frame?t=0'
//!
//! Clients poll the endpoint with a fresh cache-busting query each time;
//! the server ignores the query and returns the current frame, or a 1x1
//! placeholder PNG while the camera has nothing to show.

use std::net::SocketAddr;

use framegrab_rs::{CaptureSource, FrameServer, ServerConfig, TestPatternSource};

#[cfg(feature = "camera-nokhwa")]
use framegrab_rs::NokhwaSource;

/// Parse bind address from command line argument.
///
/// Accepts formats:
/// - "localhost" -> 127.0.0.1:8080
/// - "localhost:9090" -> 127.0.0.1:9090
/// - "127.0.0.1" -> 127.0.0.1:8080
/// - "0.0.0.0:8081" -> 0.0.0.0:8081
fn parse_bind_addr(arg: &str) -> Result<SocketAddr, String> {
    const DEFAULT_PORT: u16 = 8080;

    let normalized = arg.replace("localhost", "127.0.0.1");

    if let Ok(addr) = normalized.parse::<SocketAddr>() {
        return Ok(addr);
    }

    if let Ok(ip) = normalized.parse::<std::net::IpAddr>() {
        return Ok(SocketAddr::new(ip, DEFAULT_PORT));
    }

    Err(format!(
        "Invalid bind address: '{}'. Expected format: IP:PORT or IP or 'localhost'",
        arg
    ))
}

fn print_usage() {
    eprintln!("Usage: framegrab [OPTIONS] [BIND_ADDR]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  BIND_ADDR          Address to bind to (default: 0.0.0.0:8080)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --quality N        JPEG quality, 1-100 (default: 85)");
    eprintln!("  --width N          Capture width (default: 640)");
    eprintln!("  --height N         Capture height (default: 480)");
    eprintln!("  --device N         Camera device index (requires the camera-nokhwa feature;");
    eprintln!("                     without it a synthetic test pattern is served)");
    eprintln!("  -h, --help         Show this help");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  framegrab                          # test pattern on 0.0.0.0:8080");
    eprintln!("  framegrab localhost:9090           # custom bind address");
    eprintln!("  framegrab --quality 70             # lower quality, smaller frames");
    eprintln!("  framegrab --device 0               # first physical camera");
}

fn arg_value<'a>(args: &'a [String], i: usize, name: &str) -> &'a str {
    match args.get(i + 1) {
        Some(value) => value,
        None => {
            eprintln!("Error: {} requires a value", name);
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn parse_or_exit<T: std::str::FromStr>(value: &str, name: &str) -> T {
    match value.parse() {
        Ok(parsed) => parsed,
        Err(_) => {
            eprintln!("Error: invalid value '{}' for {}", value, name);
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    let mut bind_addr: SocketAddr = "0.0.0.0:8080".parse().unwrap();
    let mut quality: u8 = 85;
    let mut width: u32 = 640;
    let mut height: u32 = 480;
    let mut device: Option<u32> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            "--quality" => {
                quality = parse_or_exit(arg_value(&args, i, "--quality"), "--quality");
                i += 1;
            }
            "--width" => {
                width = parse_or_exit(arg_value(&args, i, "--width"), "--width");
                i += 1;
            }
            "--height" => {
                height = parse_or_exit(arg_value(&args, i, "--height"), "--height");
                i += 1;
            }
            "--device" => {
                device = Some(parse_or_exit(arg_value(&args, i, "--device"), "--device"));
                i += 1;
            }
            other => match parse_bind_addr(other) {
                Ok(addr) => bind_addr = addr,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    eprintln!();
                    print_usage();
                    std::process::exit(1);
                }
            },
        }
        i += 1;
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("framegrab_rs=info".parse()?)
                .add_directive("framegrab=info".parse()?),
        )
        .init();

    let config = ServerConfig::default()
        .bind(bind_addr)
        .jpeg_quality(quality)
        .capture_size(width, height);

    let source = open_source(device, width, height)?;

    println!("Starting frame server on {}", config.bind_addr);
    println!();
    println!("=== Fetch frames ===");
    println!(
        "Browser: http://localhost:{}/video/frame",
        config.bind_addr.port()
    );
    println!(
        "curl:    curl -o frame.jpg 'http://localhost:{}/video/frame?t=0'",
        config.bind_addr.port()
    );
    println!();

    // Create and run server; run() handles Ctrl-C and the full
    // shutdown sequence internally.
    let server = FrameServer::new(config, source)?;
    server.run().await?;

    println!("Shutdown complete");
    Ok(())
}

#[cfg(feature = "camera-nokhwa")]
fn open_source(
    device: Option<u32>,
    width: u32,
    height: u32,
) -> Result<Box<dyn CaptureSource>, Box<dyn std::error::Error>> {
    match device {
        Some(index) => {
            println!("Opening camera device {}", index);
            Ok(Box::new(NokhwaSource::open(index, width, height)?))
        }
        None => {
            println!("No --device given, serving the synthetic test pattern");
            Ok(Box::new(TestPatternSource::new(width, height)))
        }
    }
}

#[cfg(not(feature = "camera-nokhwa"))]
fn open_source(
    device: Option<u32>,
    width: u32,
    height: u32,
) -> Result<Box<dyn CaptureSource>, Box<dyn std::error::Error>> {
    if device.is_some() {
        eprintln!("Error: --device requires building with --features camera-nokhwa");
        std::process::exit(1);
    }
    println!("Serving the synthetic test pattern (build with --features camera-nokhwa for a real camera)");
    Ok(Box::new(TestPatternSource::new(width, height)))
}
