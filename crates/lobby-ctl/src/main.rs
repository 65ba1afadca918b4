//! lobby-ctl — command-line interface for the lobby daemon.

mod cmd;

use anyhow::{bail, Context, Result};

use cmd::http::Target;
use cmd::servers::Registration;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug)]
enum Command {
    Status,
    List,
    Get { ip: String, port: u16 },
    Players { ip: String, port: u16 },
    Register(Registration),
    Help,
}

fn print_usage() {
    println!("Usage: lobby-ctl [--host <host>] [--port <port>] <command>");
    println!();
    println!("Commands:");
    println!("  status                    Show live server count and expiry");
    println!("  list                      List live servers, oldest heartbeat first");
    println!("  get <ip> <port>           Show one server");
    println!("  players <ip> <port>       List players on one server");
    println!("  register <port> <name>    Announce a server from this host");
    println!("      [--map <map>] [--max-players <n>] [--player <name>]...");
    println!();
    println!("Options:");
    println!("  --host <host>   lobbyd host (default: {})", DEFAULT_HOST);
    println!("  --port <port>   lobbyd API port (default: {})", DEFAULT_PORT);
}

fn parse_port(raw: &str) -> Result<u16> {
    raw.parse()
        .with_context(|| format!("invalid port: {}", raw))
}

fn parse_register(args: &[&str]) -> Result<Registration> {
    let [port, name, rest @ ..] = args else {
        bail!("register requires <port> <name>");
    };

    let mut registration = Registration {
        port: parse_port(port)?,
        name: name.to_string(),
        map: String::new(),
        max_players: 16,
        players: Vec::new(),
    };

    let mut flags = rest.iter();
    while let Some(flag) = flags.next() {
        let value = flags
            .next()
            .with_context(|| format!("{} requires a value", flag))?;
        match *flag {
            "--map" => registration.map = value.to_string(),
            "--max-players" => {
                registration.max_players = value
                    .parse()
                    .context("--max-players must be a number")?
            }
            "--player" => registration.players.push(value.to_string()),
            other => bail!("unknown option: {}", other),
        }
    }

    Ok(registration)
}

/// Split global options from the command words.
fn parse_args(args: &[String]) -> Result<(Target, Command)> {
    let mut target = Target {
        host: DEFAULT_HOST.to_string(),
        port: DEFAULT_PORT,
    };
    let mut remaining: Vec<&str> = Vec::new();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--port" => {
                i += 1;
                target.port = args
                    .get(i)
                    .context("--port requires a value")?
                    .parse()
                    .context("--port must be a number")?;
            }
            "--host" => {
                i += 1;
                target.host = args.get(i).context("--host requires a value")?.clone();
            }
            other => remaining.push(other),
        }
        i += 1;
    }

    let command = match remaining.as_slice() {
        ["status"] | [] => Command::Status,
        ["list"] => Command::List,
        ["get", ip, port] => Command::Get {
            ip: ip.to_string(),
            port: parse_port(port)?,
        },
        ["players", ip, port] => Command::Players {
            ip: ip.to_string(),
            port: parse_port(port)?,
        },
        ["register", rest @ ..] => Command::Register(parse_register(rest)?),
        ["help"] | ["--help"] | ["-h"] => Command::Help,
        other => bail!("unknown command: {}", other.join(" ")),
    };

    Ok((target, command))
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let (target, command) = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("{:#}", e);
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    match command {
        Command::Status => cmd::status::cmd_status(&target).await,
        Command::List => cmd::servers::cmd_list(&target).await,
        Command::Get { ip, port } => cmd::servers::cmd_get(&target, &ip, port).await,
        Command::Players { ip, port } => cmd::servers::cmd_players(&target, &ip, port).await,
        Command::Register(registration) => {
            cmd::servers::cmd_register(&target, &registration).await
        }
        Command::Help => {
            print_usage();
            Ok(())
        }
    }
}
