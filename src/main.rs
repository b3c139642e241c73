mod display;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use display::output::{
    display_champion_breakdown, display_champions, display_comparison, display_configuration_required,
    display_error, display_info, display_ladder, display_match_history, display_profile, display_recent,
    display_regions, display_standings, display_stats, display_success, display_trend, display_warning,
};
use indicatif::{ProgressBar, ProgressStyle};
use league_insight::analysis::champion_stats::{ChampionStats, ChampionStatsTracker, DEFAULT_TOP_CHAMPIONS};
use league_insight::analysis::history::{HistoryOptions, MatchHistoryAggregator, NormalizedMatchRecord};
use league_insight::analysis::ladder::ladder;
use league_insight::analysis::stats::{self, AggregateStats, ComparisonMetric, RadarPoint, DEFAULT_TREND_LENGTH};
use league_insight::api::models::{ChampionDto, LeagueEntryDto, SummonerDto};
use league_insight::api::service::{parse_riot_id, RiotService};
use league_insight::cache::{CachedMatchSource, Operation, QueryCache};
use league_insight::config::Config;
use league_insight::error::AppError;
use league_insight::prefs::Preferences;
use league_insight::region::Region;
use league_insight::resolved::Resolved;
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const CACHE_DIR: &str = "cache";

#[derive(Parser, Debug)]
#[command(name = "league_insight")]
#[command(about = "Look up League of Legends players and analyze their recent matches", long_about = None)]
struct Cli {
    /// Log requests and rate-limit telemetry to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Profile, ranked standings and recent match analysis for one player
    Profile(ProfileArgs),
    /// Ranked ladder for a queue, tier and division
    Rankings(RankingsArgs),
    /// Champion catalog for a game version
    Champions(ChampionsArgs),
    /// Check that RIOT_API_KEY is accepted upstream
    CheckKey,
    /// Recently looked-up players
    Recent,
    /// List supported regions, optionally saving a new default
    Regions {
        /// Region to remember for later lookups
        #[arg(long)]
        set: Option<String>,
    },
}

#[derive(Args, Debug)]
struct ProfileArgs {
    /// Riot ID (Name#TAG) or summoner name
    player: String,

    /// Platform region, e.g. euw1 or na1
    #[arg(short, long)]
    region: Option<String>,

    /// Number of recent match ids to request (default: RIOT_MATCH_COUNT or 20)
    #[arg(short, long)]
    matches: Option<usize>,

    /// How many of those matches to load in detail (default: RIOT_MATCH_DETAIL_LIMIT or 5)
    #[arg(short, long)]
    details: Option<usize>,

    /// Games shown in the trend table
    #[arg(long, default_value_t = DEFAULT_TREND_LENGTH)]
    trend: usize,

    /// Ignore cached responses
    #[arg(long)]
    refresh: bool,

    /// Print the report as JSON instead of tables
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct RankingsArgs {
    #[arg(long, default_value = "RANKED_SOLO_5x5")]
    queue: String,

    #[arg(long, default_value = "DIAMOND")]
    tier: String,

    #[arg(long, default_value = "I")]
    division: String,

    /// Only show summoners whose name contains this text
    #[arg(short, long, default_value = "")]
    search: String,

    #[arg(short, long)]
    region: Option<String>,

    #[arg(long)]
    refresh: bool,
}

#[derive(Args, Debug)]
struct ChampionsArgs {
    /// Game version (default: latest)
    #[arg(long)]
    version: Option<String>,

    /// Only show champions whose name or id contains this text
    #[arg(short, long)]
    search: Option<String>,

    #[arg(long)]
    refresh: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfileReport<'a> {
    player: &'a str,
    region: &'a str,
    summoner: &'a SummonerDto,
    standings: &'a [LeagueEntryDto],
    matches: &'a [NormalizedMatchRecord],
    skipped_matches: Vec<&'a str>,
    stats: &'a AggregateStats,
    top_champions: &'a [ChampionStats],
    comparison: &'a [ComparisonMetric],
    radar: &'a [RadarPoint],
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli.command) {
        let code = exit_code(&e);
        match code {
            EXIT_MISSING_CREDENTIAL => display_configuration_required(&format!("{:#}", e)),
            EXIT_TRANSIENT => {
                display_error(&format!("{:#}", e));
                display_warning("The upstream problem looks temporary, retry in a moment");
            }
            _ => display_error(&format!("{:#}", e)),
        }
        std::process::exit(code);
    }
}

const EXIT_FAILURE: i32 = 1;
const EXIT_MISSING_CREDENTIAL: i32 = 2;
const EXIT_TRANSIENT: i32 = 3;

fn exit_code(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<AppError>() {
        Some(AppError::MissingCredential) => EXIT_MISSING_CREDENTIAL,
        Some(e) if e.is_transient() => EXIT_TRANSIENT,
        _ => EXIT_FAILURE,
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("warn,league_insight=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn run(command: Command) -> Result<()> {
    let config = Config::from_env().context("Invalid configuration")?;
    debug!("Using data directory {}", config.data_dir.display());

    match command {
        Command::Profile(args) => profile(&config, args),
        Command::Rankings(args) => rankings(&config, args),
        Command::Champions(args) => champions(&config, args),
        Command::CheckKey => check_key(&config),
        Command::Recent => {
            display_recent(&Preferences::load(&config.data_dir));
            Ok(())
        }
        Command::Regions { set } => regions(&config, set),
    }
}

/// Command-line flag, then `RIOT_REGION`, then the saved preference.
fn resolve_region(flag: Option<&str>, config: &Config, prefs: &Preferences) -> Region {
    let region = flag
        .or(config.region.as_deref())
        .map(Region::new)
        .unwrap_or_else(|| prefs.region.clone());

    if !region.is_supported() {
        display_warning(&format!(
            "Region '{}' is not recognised; match data will be routed through europe",
            region
        ));
    }
    region
}

fn profile(config: &Config, args: ProfileArgs) -> Result<()> {
    let mut prefs = Preferences::load(&config.data_dir);
    let region = resolve_region(args.region.as_deref(), config, &prefs);
    let cache = QueryCache::new(config.data_dir.join(CACHE_DIR)).refreshing(args.refresh);
    let service = RiotService::new(config);

    if !args.json {
        display_info(&format!("Looking up {} in {}", args.player, region));
    }

    let (summoner, display_name) = find_summoner(&service, &cache, &args.player, &region)?;

    // summoners resolved by puuid on some platforms come back without an encrypted id
    let standings = if summoner.id.is_empty() {
        Vec::new()
    } else {
        cache
            .get_or_fetch(
                Operation::LeagueEntries,
                &[region.id(), summoner.id.as_str()],
                || service.get_league_entries(&summoner.id, &region),
            )
            .context("Failed to load ranked standings")?
    };

    let options = HistoryOptions {
        count: args.matches.unwrap_or(config.match_count),
        detail_limit: args.details.unwrap_or(config.detail_limit),
    };
    let aggregator = MatchHistoryAggregator::new(CachedMatchSource::new(&service, &cache), options);

    let progress = if args.json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(options.count.min(options.detail_limit) as u64)
    };
    if let Ok(style) = ProgressStyle::default_bar().template("{spinner:.cyan} [{bar:30.cyan}] {pos}/{len} {msg}") {
        progress.set_style(style);
    }
    progress.set_message("Fetching match details");

    let history = aggregator
        .fetch_with_progress(&summoner.puuid, &region, |match_id| {
            progress.set_message(match_id.to_string());
            progress.inc(1);
        })
        .context("Failed to load match history")?;
    progress.finish_and_clear();

    let stats = AggregateStats::from_records(&history.records, args.trend);
    let top_champions = ChampionStatsTracker::from_records(&history.records).top(DEFAULT_TOP_CHAMPIONS);
    let comparison = stats::comparison(&history.records);
    let radar = stats::radar(&history.records);

    if args.json {
        let report = ProfileReport {
            player: &display_name,
            region: region.id(),
            summoner: &summoner,
            standings: &standings,
            matches: &history.records,
            skipped_matches: history.failures.iter().map(|f| f.match_id.as_str()).collect(),
            stats: &stats,
            top_champions: &top_champions,
            comparison: &comparison,
            radar: &radar,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        display_profile(&summoner, &display_name, &region);
        display_standings(&standings);
        display_match_history(&history.records, history.failures.len());
        display_stats(&stats);
        display_champion_breakdown(&top_champions);
        display_comparison(&comparison, &radar);
        display_trend(&stats);
    }

    prefs.add_recent_search(&args.player);
    if args.region.is_some() {
        prefs.set_region(region);
    }
    if let Err(e) = prefs.save() {
        display_warning(&format!("Could not save preferences: {}", e));
    }

    Ok(())
}

/// `Name#TAG` goes through the account service, anything else is a summoner name.
fn find_summoner(
    service: &RiotService,
    cache: &QueryCache,
    player: &str,
    region: &Region,
) -> Result<(SummonerDto, String)> {
    match parse_riot_id(player)? {
        Some((name, tag)) => {
            let account = cache
                .get_or_fetch(Operation::Account, &[region.id(), name, tag], || {
                    service.get_account_by_riot_id(name, tag, region)
                })
                .with_context(|| format!("Failed to find Riot ID {}#{}", name, tag))?;

            let summoner = cache
                .get_or_fetch(
                    Operation::Summoner,
                    &[region.id(), "puuid", account.puuid.as_str()],
                    || service.get_summoner_by_puuid(&account.puuid, region),
                )
                .with_context(|| format!("Failed to load summoner for {}#{}", name, tag))?;

            let display_name = match (&account.game_name, &account.tag_line) {
                (Some(game_name), Some(tag_line)) => format!("{}#{}", game_name, tag_line),
                _ => format!("{}#{}", name, tag),
            };
            Ok((summoner, display_name))
        }
        None => {
            let name = player.trim();
            let summoner = cache
                .get_or_fetch(Operation::Summoner, &[region.id(), "name", name], || {
                    service.get_summoner_by_name(name, region)
                })
                .with_context(|| format!("Failed to find summoner {}", name))?;

            let display_name = if summoner.name.is_empty() {
                name.to_string()
            } else {
                summoner.name.clone()
            };
            Ok((summoner, display_name))
        }
    }
}

fn rankings(config: &Config, args: RankingsArgs) -> Result<()> {
    let prefs = Preferences::load(&config.data_dir);
    let region = resolve_region(args.region.as_deref(), config, &prefs);
    let cache = QueryCache::new(config.data_dir.join(CACHE_DIR)).refreshing(args.refresh);
    let service = RiotService::new(config);

    let entries = cache
        .get_or_fetch(
            Operation::Ladder,
            &[region.id(), args.queue.as_str(), args.tier.as_str(), args.division.as_str()],
            || service.get_league_by_tier_division(&args.queue, &args.tier, &args.division, &region),
        )
        .with_context(|| format!("Failed to load the {} {} ladder", args.tier, args.division))?;

    let rows = ladder(&entries, &args.search);
    let title = format!("{} {} {} ({})", args.queue, args.tier, args.division, region);
    display_ladder(&rows, &title);
    Ok(())
}

fn champions(config: &Config, args: ChampionsArgs) -> Result<()> {
    let cache = QueryCache::new(config.data_dir.join(CACHE_DIR)).refreshing(args.refresh);
    let service = RiotService::new(config);

    let version = match args.version {
        Some(version) => version,
        None => latest_version(&service, &cache),
    };

    let catalog = cache
        .get_or_fetch(Operation::Champions, &[version.as_str(), config.locale.as_str()], || {
            service.get_all_champions(&version)
        })
        .with_context(|| format!("Failed to load the champion catalog for {}", version))?;

    let needle = args.search.unwrap_or_default().trim().to_lowercase();
    let mut matching: Vec<&ChampionDto> = catalog
        .values()
        .filter(|c| {
            needle.is_empty()
                || c.name.to_lowercase().contains(&needle)
                || c.id.to_lowercase().contains(&needle)
        })
        .collect();
    matching.sort_by(|a, b| a.name.cmp(&b.name));

    display_champions(&matching, &version);
    Ok(())
}

/// Only exact versions are cached so a fallback is retried on the next run.
fn latest_version(service: &RiotService, cache: &QueryCache) -> String {
    if let Some(version) = cache.get::<String>(Operation::Version, &["latest"]) {
        return version;
    }

    match service.get_current_version() {
        Resolved::Exact(version) => {
            if let Err(e) = cache.put(Operation::Version, &["latest"], &version) {
                debug!("{}", e);
            }
            version
        }
        Resolved::Fallback { value, reason } => {
            display_warning(&format!(
                "Could not fetch the latest version ({}); showing patch {}",
                reason, value
            ));
            value
        }
    }
}

fn check_key(config: &Config) -> Result<()> {
    if !config.has_credential() {
        return Err(AppError::MissingCredential.into());
    }

    let service = RiotService::new(config);
    if service.is_api_key_valid() {
        display_success("API key is valid");
        Ok(())
    } else {
        bail!("API key was rejected; development keys expire every 24 hours")
    }
}

fn regions(config: &Config, set: Option<String>) -> Result<()> {
    let mut prefs = Preferences::load(&config.data_dir);

    if let Some(id) = set {
        let region = Region::new(&id);
        if !region.is_supported() {
            bail!("Unknown region '{}'", id);
        }
        prefs.set_region(region);
        prefs.save().context("Failed to save preferences")?;
        display_success(&format!("Default region set to {}", prefs.region));
    }

    display_regions(prefs.region.id());
    Ok(())
}
