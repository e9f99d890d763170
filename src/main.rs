use clap::{Arg, Command};
use log::LevelFilter;
use phishield::config_loader::ConfigLoader;
use phishield::{
    AnalysisEngine, AnalysisLogger, AnalysisResult, CheckKind, Config, IndicatorTables,
    RiskLevel, StatisticsStore,
};
use std::process;

const MAX_URL_CHARS: usize = 500;
const MAX_MESSAGE_CHARS: usize = 2000;

const TIPS: &[&str] = &[
    "Always verify the sender's email address before clicking links.",
    "Check for HTTPS and a padlock icon in your browser's address bar.",
    "Be wary of urgent messages asking you to act immediately.",
    "Never share passwords or sensitive info via email or message.",
    "Hover over links to preview the actual URL before clicking.",
    "Be suspicious of shortened URLs from unknown sources.",
    "Look for spelling errors in domain names.",
    "Enable two-factor authentication on all important accounts.",
];

fn cli() -> Command {
    Command::new("phishield")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Heuristic phishing checks for URLs, messages and email addresses")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("phishield.yaml"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug logging with per-check detail")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("user")
                .short('u')
                .long("user")
                .value_name("NAME")
                .help("User the check is recorded under (defaults to $USER)"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print results as JSON")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("check-url")
                .long("check-url")
                .value_name("URL")
                .help("Analyze a URL for phishing indicators"),
        )
        .arg(
            Arg::new("check-message")
                .long("check-message")
                .value_name("TEXT")
                .help("Analyze a message for phishing indicators"),
        )
        .arg(
            Arg::new("check-message-file")
                .long("check-message-file")
                .value_name("FILE")
                .help("Analyze the contents of a file as a message"),
        )
        .arg(
            Arg::new("validate-email")
                .long("validate-email")
                .value_name("ADDRESS")
                .help("Check an email address for syntax and disposable domains"),
        )
        .arg(
            Arg::new("stats")
                .long("stats")
                .help("Show per-user check statistics")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("stats-reset")
                .long("stats-reset")
                .help("Reset all statistics and history, then exit")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("history")
                .long("history")
                .value_name("N")
                .help("Show the most recent checks for the user")
                .num_args(0..=1)
                .default_missing_value("10")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Write a default configuration file"),
        )
        .arg(
            Arg::new("generate-indicators")
                .long("generate-indicators")
                .value_name("FILE")
                .help("Write the built-in indicator tables as YAML"),
        )
        .arg(
            Arg::new("test-config")
                .long("test-config")
                .help("Load configuration and indicator tables, then report")
                .action(clap::ArgAction::SetTrue),
        )
}

fn main() {
    let mut command = cli();
    let matches = command.clone().get_matches();
    let verbose = matches.get_flag("verbose");

    env_logger::Builder::new()
        .filter_level(LevelFilter::Trace)
        .parse_default_env()
        .init();
    log::set_max_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });

    if let Some(path) = matches.get_one::<String>("generate-config") {
        match Config::default().to_file(path) {
            Ok(()) => {
                println!("Default configuration written to: {path}");
                println!("Please edit the configuration file to suit your needs.");
            }
            Err(e) => fail(&format!("Error writing configuration file: {e:#}")),
        }
        return;
    }

    if let Some(path) = matches.get_one::<String>("generate-indicators") {
        match IndicatorTables::default().to_file(path) {
            Ok(()) => println!("Default indicator tables written to: {path}"),
            Err(e) => fail(&format!("Error writing indicator tables: {e:#}")),
        }
        return;
    }

    let config_path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or("phishield.yaml");
    let config = match ConfigLoader::load_config(config_path) {
        Ok(config) => config,
        Err(e) => fail(&format!("Error loading configuration: {e:#}")),
    };
    if !verbose {
        log::set_max_level(config.log_level());
    }

    let tables = match ConfigLoader::load_indicators(&config) {
        Ok(tables) => tables,
        Err(e) => fail(&format!("Error loading indicator tables: {e:#}")),
    };

    if matches.get_flag("test-config") {
        print_config_report(&config, &tables);
        return;
    }

    let user = matches
        .get_one::<String>("user")
        .cloned()
        .or_else(|| std::env::var("USER").ok())
        .unwrap_or_else(|| "anonymous".to_string());
    let json = matches.get_flag("json");

    if matches.get_flag("stats-reset") {
        let mut store = open_store(&config);
        match store.reset() {
            Ok(()) => println!("✅ Statistics reset successfully"),
            Err(e) => fail(&format!("Failed to reset statistics: {e:#}")),
        }
        return;
    }

    if matches.get_flag("stats") {
        show_stats(&open_store(&config), json);
        return;
    }

    if let Some(limit) = matches.get_one::<usize>("history") {
        show_history(&open_store(&config), &user, *limit, json);
        return;
    }

    let engine = AnalysisEngine::new(tables);

    if let Some(email) = matches.get_one::<String>("validate-email") {
        let result = engine.validate_email(email);
        if json {
            print_json(&result);
        } else if result.valid {
            println!("✅ {}", result.reason);
        } else {
            println!("❌ {}", result.reason);
        }
        if !result.valid {
            process::exit(2);
        }
        return;
    }

    if let Some(url) = matches.get_one::<String>("check-url") {
        run_check(&engine, &config, &user, CheckKind::Url, url, json);
        return;
    }

    let message = if let Some(text) = matches.get_one::<String>("check-message") {
        Some(text.clone())
    } else if let Some(file) = matches.get_one::<String>("check-message-file") {
        match std::fs::read_to_string(file) {
            Ok(text) => Some(text),
            Err(e) => fail(&format!("Error reading message file {file}: {e}")),
        }
    } else {
        None
    };
    if let Some(text) = message {
        run_check(&engine, &config, &user, CheckKind::Message, &text, json);
        return;
    }

    if let Err(e) = command.print_help() {
        log::error!("Failed to print help: {e}");
    }
    println!();
}

fn run_check(
    engine: &AnalysisEngine,
    config: &Config,
    user: &str,
    kind: CheckKind,
    content: &str,
    json: bool,
) {
    let limit = match kind {
        CheckKind::Url => MAX_URL_CHARS,
        CheckKind::Message => MAX_MESSAGE_CHARS,
    };
    let length = content.chars().count();
    if length > limit {
        fail(&format!(
            "{} is {} characters long; the limit is {}",
            kind.label(),
            length,
            limit
        ));
    }

    let result = match kind {
        CheckKind::Url => {
            log::info!("URL check by {}: {}", user, content);
            engine.analyze_url(content)
        }
        CheckKind::Message => {
            log::info!("Message analysis by {}", user);
            engine.analyze_message(content)
        }
    };

    if config.statistics.enabled {
        if let Err(e) = record_statistics(config, user, kind, content, &result) {
            log::error!("Failed to record statistics: {e:#}");
        }
    }

    if config.audit_log.enabled {
        let logger = AnalysisLogger::new(&config.audit_log.directory);
        if let Err(e) = logger.record(user, kind, content, &result) {
            log::error!("Failed to write analysis log: {e:#}");
        }
    }

    match kind {
        CheckKind::Url => log::info!("URL analysis completed - Risk: {}", result.level),
        CheckKind::Message => log::info!("Message analysis completed - Risk: {}", result.level),
    }

    if json {
        print_json(&result);
    } else {
        print_result(kind, &result, content);
    }
}

fn print_result(kind: CheckKind, result: &AnalysisResult, content: &str) {
    let badge = match result.level {
        RiskLevel::Safe => "✅",
        RiskLevel::Suspicious => "⚠️",
        RiskLevel::Dangerous => "🚨",
        RiskLevel::Error => "❌",
    };
    println!("🔍 {} analysis", kind.label());
    println!("{} Risk: {}", badge, result.level);
    if result.flags.is_empty() {
        println!("  • {}", result.summary());
    } else {
        for flag in &result.flags {
            println!("  • {flag}");
        }
    }
    println!();
    println!("💡 Tip: {}", TIPS[content.chars().count() % TIPS.len()]);
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => fail(&format!("Failed to serialize result: {e}")),
    }
}

fn print_config_report(config: &Config, tables: &IndicatorTables) {
    println!("🔍 Testing configuration...");
    println!();
    match &config.indicators_file {
        Some(path) => println!("Indicator tables: {path}"),
        None => println!("Indicator tables: built-in"),
    }
    println!("  Suspicious keywords: {}", tables.suspicious_keywords.len());
    println!("  Suspicious TLDs: {}", tables.suspicious_tlds.len());
    println!("  Urgent phrases: {}", tables.urgent_phrases.len());
    println!("  Personal-info terms: {}", tables.personal_info_terms.len());
    println!("  Disposable domains: {}", tables.disposable_domains.len());
    println!(
        "Audit log: {}",
        if config.audit_log.enabled {
            config.audit_log.directory.as_str()
        } else {
            "disabled"
        }
    );
    println!(
        "Statistics: {}",
        if config.statistics.enabled {
            config.statistics.path.as_str()
        } else {
            "disabled"
        }
    );
    println!("✅ Configuration validated");
}

fn show_stats(store: &StatisticsStore, json: bool) {
    let users: Vec<_> = store.all_users().collect();
    if json {
        print_json(&users);
        return;
    }

    println!("📊 PhiShield Statistics");
    println!("═══════════════════════════════════════");
    if users.is_empty() {
        println!("📭 No checks recorded yet");
        return;
    }

    println!("┌──────────────────────────┬─────────┬─────────┬───────┬─────────┐");
    println!("│ User                     │  Checks │ Threats │  Safe │  Rate % │");
    println!("├──────────────────────────┼─────────┼─────────┼───────┼─────────┤");
    for stats in users {
        println!(
            "│ {:<24} │ {:>7} │ {:>7} │ {:>5} │ {:>7.2} │",
            truncate_string(&stats.user, 24),
            stats.total_checks,
            stats.threats_detected,
            stats.safe_checks(),
            stats.success_rate()
        );
    }
    println!("└──────────────────────────┴─────────┴─────────┴───────┴─────────┘");
}

fn show_history(store: &StatisticsStore, user: &str, limit: usize, json: bool) {
    let records = store.history(Some(user), limit);
    if json {
        print_json(&records);
        return;
    }

    if records.is_empty() {
        println!("📭 No checks recorded for {user}");
        return;
    }

    println!("🕘 Recent checks for {user}");
    for record in records {
        println!(
            "  {} [{:<7}] {:<10} {}",
            record.date_checked.format("%Y-%m-%d %H:%M"),
            record.kind.label(),
            record.risk_level,
            truncate_string(&record.content, 60)
        );
    }
}

/// Statistics failures never change or suppress a completed verdict.
fn record_statistics(
    config: &Config,
    user: &str,
    kind: CheckKind,
    content: &str,
    result: &AnalysisResult,
) -> anyhow::Result<()> {
    let mut store =
        StatisticsStore::open(&config.statistics.path, config.statistics.max_history)?;
    store.record(user, kind, content, result)
}

fn open_store(config: &Config) -> StatisticsStore {
    match StatisticsStore::open(&config.statistics.path, config.statistics.max_history) {
        Ok(store) => store,
        Err(e) => fail(&format!("Failed to access statistics: {e:#}")),
    }
}

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

fn fail(message: &str) -> ! {
    eprintln!("❌ {message}");
    process::exit(1);
}
