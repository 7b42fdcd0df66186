use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::{Read, Write};
use std::net::TcpStream;

#[derive(Parser)]
#[command(name = "respd-cli")]
#[command(about = "A CLI for respd", long_about = None)]
struct Cli {
    #[arg(short = 'H', long, default_value = "127.0.0.1", global = true)]
    host: String,
    #[arg(short, long, default_value = "3030", global = true)]
    port: u16,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a PING, optionally echoing a message back
    Ping { message: Option<String> },
    /// Echo a message back
    Echo { message: String },
    /// Authenticate the connection
    Auth { password: String },
    /// Select a logical database
    Select { index: i64 },
    /// Swap the contents of two logical databases
    Swapdb { first: i64, second: i64 },
    /// Close the connection
    Quit,
}

/// Encodes `args` as a RESP array of bulk strings, the wire shape every
/// request this server accepts must take.
fn encode_request(args: &[&str]) -> String {
    let mut out = format!("*{}\r\n", args.len());
    for arg in args {
        out.push_str(&format!("${}\r\n{}\r\n", arg.len(), arg));
    }
    out
}

fn send(host: &str, port: u16, args: &[&str]) -> Result<()> {
    let mut stream = TcpStream::connect((host, port))?;
    stream.write_all(encode_request(args).as_bytes())?;
    let mut buf = [0; 4096];
    let n = stream.read(&mut buf)?;
    let resp = String::from_utf8_lossy(&buf[..n]);
    println!("{}", resp.trim_end());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match &cli.command {
        Commands::Ping { message: None } => send(&cli.host, cli.port, &["PING"])?,
        Commands::Ping { message: Some(m) } => send(&cli.host, cli.port, &["PING", m])?,
        Commands::Echo { message } => send(&cli.host, cli.port, &["ECHO", message])?,
        Commands::Auth { password } => send(&cli.host, cli.port, &["AUTH", password])?,
        Commands::Select { index } => {
            send(&cli.host, cli.port, &["SELECT", &index.to_string()])?
        }
        Commands::Swapdb { first, second } => send(
            &cli.host,
            cli.port,
            &["SWAPDB", &first.to_string(), &second.to_string()],
        )?,
        Commands::Quit => send(&cli.host, cli.port, &["QUIT"])?,
    }
    Ok(())
}
