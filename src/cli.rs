use clap::{crate_description, crate_version, Arg, ArgAction, ArgMatches, Command};
use pretty_env_logger::env_logger::Builder;
use std::env;
use std::io::Write;
use std::process::exit;

use linode_dns::common::{DnsDriver, Result, ZoneType};
use linode_dns::linode::{LinodeDriver, RecordExtra, ZoneExtra};
use linode_dns::Config;

fn set_logger_level(b: &mut Builder) {
    let mut b = b;
    if env::var("RUST_LOG").is_err() {
        b = b.filter_level(log::LevelFilter::Info)
    }
    b.init();
}

fn setup_logger() {
    // Adapted from env_logger examples. <3 Systemd support
    match std::env::var("RUST_LOG_STYLE") {
        Ok(s) if s == "SYSTEMD" => {
            let builder = &mut pretty_env_logger::env_logger::builder();
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "<{}>{}: {}",
                    match record.level() {
                        log::Level::Error => 3,
                        log::Level::Warn => 4,
                        log::Level::Info => 6,
                        log::Level::Debug => 7,
                        log::Level::Trace => 7,
                    },
                    record.target(),
                    record.args()
                )
            });
            set_logger_level(builder);
        }
        _ => {
            let builder = &mut pretty_env_logger::formatted_builder();
            set_logger_level(builder);
        }
    };
}

fn id_arg(name: &'static str) -> Arg {
    Arg::new(name).required(true)
}

fn ttl_arg() -> Arg {
    Arg::new("ttl")
        .long("ttl")
        .value_parser(clap::value_parser!(u32))
        .help("Time to live in seconds")
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(out) => println!("{out}"),
        Err(err) => tracing::error!(error = err.to_string(), "Failed to render output"),
    }
}

fn string<'a>(args: &'a ArgMatches, name: &str) -> &'a str {
    args.get_one::<String>(name).map(String::as_str).unwrap_or_default()
}

fn run(driver: &LinodeDriver, command: (&str, &ArgMatches)) -> Result<()> {
    match command {
        ("zones", _) => print_json(&driver.list_zones()?),
        ("zone", args) => print_json(&driver.get_zone(string(args, "zone-id"))?),
        ("records", args) => {
            let zone = driver.get_zone(string(args, "zone-id"))?;
            print_json(&driver.list_records(&zone)?)
        }
        ("record", args) => print_json(
            &driver.get_record(string(args, "zone-id"), string(args, "record-id"))?,
        ),
        ("create-zone", args) => {
            let zone_type: ZoneType = string(args, "type").parse()?;
            let extra = ZoneExtra {
                soa_email: args.get_one::<String>("soa-email").cloned(),
                ..Default::default()
            };
            print_json(&driver.create_zone(
                string(args, "domain"),
                zone_type,
                args.get_one::<u32>("ttl").copied(),
                extra,
            )?)
        }
        ("delete-zone", args) => {
            let zone = driver.get_zone(string(args, "zone-id"))?;
            print_json(&driver.delete_zone(&zone)?)
        }
        ("create-record", args) => {
            let zone = driver.get_zone(string(args, "zone-id"))?;
            let extra = RecordExtra {
                ttl_sec: args.get_one::<u32>("ttl").copied(),
                ..Default::default()
            };
            print_json(&driver.create_record(
                string(args, "name"),
                &zone,
                string(args, "type").parse()?,
                string(args, "data"),
                extra,
            )?)
        }
        ("delete-record", args) => {
            let record = driver.get_record(string(args, "zone-id"), string(args, "record-id"))?;
            print_json(&driver.delete_record(&record)?)
        }
        (name, _) => tracing::warn!(command = name, "Unknown command"),
    }
    Ok(())
}

pub(crate) fn main() {
    let cli = Command::new("linode-dns")
        .about(format!(
            "{}\n{} {}",
            crate_description!(),
            "Configuration is managed using environment variables.",
            "See the docs for more information.",
        ))
        .arg(
            Arg::new("check")
                .action(ArgAction::SetTrue)
                .short('t')
                .long("test")
                .help("Check the configuration"),
        )
        .subcommand(Command::new("zones").about("List zones"))
        .subcommand(
            Command::new("zone")
                .about("Show a zone")
                .arg(id_arg("zone-id")),
        )
        .subcommand(
            Command::new("records")
                .about("List the records of a zone")
                .arg(id_arg("zone-id")),
        )
        .subcommand(
            Command::new("record")
                .about("Show a record")
                .arg(id_arg("zone-id"))
                .arg(id_arg("record-id")),
        )
        .subcommand(
            Command::new("create-zone")
                .about("Create a zone")
                .arg(id_arg("domain"))
                .arg(
                    Arg::new("type")
                        .long("type")
                        .default_value("master")
                        .help("Zone type, master or slave"),
                )
                .arg(ttl_arg())
                .arg(
                    Arg::new("soa-email")
                        .long("soa-email")
                        .help("SOA contact address"),
                ),
        )
        .subcommand(
            Command::new("delete-zone")
                .about("Delete a zone")
                .arg(id_arg("zone-id")),
        )
        .subcommand(
            Command::new("create-record")
                .about("Create a record")
                .arg(id_arg("zone-id"))
                .arg(id_arg("name"))
                .arg(id_arg("type"))
                .arg(id_arg("data"))
                .arg(ttl_arg()),
        )
        .subcommand(
            Command::new("delete-record")
                .about("Delete a record")
                .arg(id_arg("zone-id"))
                .arg(id_arg("record-id")),
        )
        .version(crate_version!());

    let args = cli.get_matches();

    setup_logger();

    let driver = match Config::from_env().and_then(Config::into_driver) {
        Ok(d) => d,
        Err(err) => {
            println!("{err}");
            exit(2);
        }
    };

    if args.get_flag("check") {
        tracing::info!("Configuration is valid.");
        exit(0);
    }

    let Some(command) = args.subcommand() else {
        println!("No command given, see --help");
        exit(2);
    };

    if let Err(err) = run(&driver, command) {
        tracing::error!(error = err.to_string(), "Command failed");
        exit(1);
    }
}
