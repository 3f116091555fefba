mod commands;

use clap::{App, Arg};
use log::info;
use maildeck::automation::ActionLevel;
use maildeck::email::Folder;
use maildeck::Config;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_secs()
        .init();

    let matches = App::new("maildeck")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Demo webmail client with batch email automation")
        .subcommand(App::new("inbox").about("List inbox emails"))
        .subcommand(App::new("sent").about("List sent emails"))
        .subcommand(
            App::new("read")
                .about("Show a single email")
                .arg(Arg::new("id").value_name("ID").required(true).takes_value(true)),
        )
        .subcommand(
            App::new("compose")
                .about("Send a new email")
                .arg(
                    Arg::new("from")
                        .long("from")
                        .value_name("ADDRESS")
                        .default_value("user@example.com")
                        .takes_value(true),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .value_name("ADDRESS")
                        .required(true)
                        .takes_value(true),
                )
                .arg(
                    Arg::new("subject")
                        .long("subject")
                        .value_name("TEXT")
                        .required(true)
                        .takes_value(true),
                )
                .arg(
                    Arg::new("body")
                        .long("body")
                        .value_name("TEXT")
                        .required(true)
                        .takes_value(true),
                ),
        )
        .subcommand(
            App::new("reply")
                .about("Reply to an email")
                .arg(Arg::new("id").value_name("ID").required(true).takes_value(true))
                .arg(
                    Arg::new("body")
                        .long("body")
                        .value_name("TEXT")
                        .required(true)
                        .takes_value(true),
                ),
        )
        .subcommand(
            App::new("delete")
                .about("Delete an email")
                .arg(Arg::new("id").value_name("ID").required(true).takes_value(true)),
        )
        .subcommand(
            App::new("automate")
                .about("Hand unread inbox emails to the automation service")
                .arg(
                    Arg::new("select")
                        .long("select")
                        .value_name("IDS")
                        .help("Comma-separated email ids; default is every unread email")
                        .takes_value(true),
                )
                .arg(
                    Arg::new("level")
                        .long("level")
                        .value_name("LEVEL")
                        .help("Action risk level: low, medium or high")
                        .default_value("medium")
                        .takes_value(true),
                )
                .arg(
                    Arg::new("apply")
                        .long("apply")
                        .help("Apply the reviewed actions once the job completes")
                        .takes_value(false),
                ),
        )
        .subcommand(
            App::new("watch")
                .about("Attach to an existing automation job")
                .arg(
                    Arg::new("job_id")
                        .value_name("JOB_ID")
                        .required(true)
                        .takes_value(true),
                )
                .arg(
                    Arg::new("apply")
                        .long("apply")
                        .help("Apply the reviewed actions once the job completes")
                        .takes_value(false),
                ),
        )
        .get_matches();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(2);
        }
    };
    info!(
        "Using mail API {} and automation service {}",
        config.mail_api_url, config.automation_api_url
    );

    let result = match matches.subcommand() {
        Some(("inbox", _)) => commands::mail::list(&config, Folder::Inbox).await,
        Some(("sent", _)) => commands::mail::list(&config, Folder::Sent).await,
        Some(("read", sub)) => commands::mail::read(&config, sub.value_of("id").unwrap()).await,
        Some(("compose", sub)) => {
            commands::mail::compose(
                &config,
                sub.value_of("from").unwrap(),
                sub.value_of("to").unwrap(),
                sub.value_of("subject").unwrap(),
                sub.value_of("body").unwrap(),
            )
            .await
        }
        Some(("reply", sub)) => {
            commands::mail::reply(
                &config,
                sub.value_of("id").unwrap(),
                sub.value_of("body").unwrap(),
            )
            .await
        }
        Some(("delete", sub)) => commands::mail::delete(&config, sub.value_of("id").unwrap()).await,
        Some(("automate", sub)) => {
            let level = match sub.value_of("level").unwrap().parse::<ActionLevel>() {
                Ok(level) => level,
                Err(err) => {
                    eprintln!("Error: {}", err);
                    std::process::exit(2);
                }
            };
            commands::automate::automate(&config, sub.value_of("select"), level, sub.is_present("apply"))
                .await
        }
        Some(("watch", sub)) => {
            commands::automate::watch(&config, sub.value_of("job_id").unwrap(), sub.is_present("apply"))
                .await
        }
        _ => {
            eprintln!("No command given; try --help");
            std::process::exit(2);
        }
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
