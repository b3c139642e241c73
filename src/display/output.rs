use colored::*;
use league_insight::analysis::champion_stats::ChampionStats;
use league_insight::analysis::history::NormalizedMatchRecord;
use league_insight::analysis::ladder::LadderRow;
use league_insight::analysis::stats::{AggregateStats, ComparisonMetric, RadarPoint};
use league_insight::api::models::{ChampionDto, LeagueEntryDto, SummonerDto};
use league_insight::prefs::Preferences;
use league_insight::region::{Region, SUPPORTED_REGIONS};
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct MatchRow {
    #[tabled(rename = "#")]
    number: String,
    champion: String,
    result: String,
    #[tabled(rename = "K/D/A")]
    kda_line: String,
    #[tabled(rename = "KDA")]
    kda: String,
    #[tabled(rename = "CS/min")]
    cs_per_min: String,
    duration: String,
    role: String,
}

#[derive(Tabled)]
struct StandingRow {
    queue: String,
    rank: String,
    #[tabled(rename = "LP")]
    lp: String,
    record: String,
    flags: String,
}

#[derive(Tabled)]
struct ChampionRow {
    champion: String,
    games: String,
    win_rate: String,
    #[tabled(rename = "KDA")]
    kda: String,
}

#[derive(Tabled)]
struct ComparisonRow {
    metric: String,
    you: String,
    #[tabled(rename = "rank avg")]
    baseline: String,
}

#[derive(Tabled)]
struct TrendRow {
    game: String,
    #[tabled(rename = "KDA")]
    kda: String,
    #[tabled(rename = "CS")]
    cs: String,
    #[tabled(rename = "DMG (k)")]
    damage: String,
}

#[derive(Tabled)]
struct LadderTableRow {
    #[tabled(rename = "#")]
    rank: String,
    summoner: String,
    tier: String,
    #[tabled(rename = "LP")]
    lp: String,
    win_rate: String,
    games: String,
}

#[derive(Tabled)]
struct CatalogRow {
    id: String,
    name: String,
    title: String,
    tags: String,
}

#[derive(Tabled)]
struct RegionRow {
    id: String,
    name: String,
    routing: String,
}

#[derive(Tabled)]
struct RecentRow {
    #[tabled(rename = "#")]
    number: String,
    player: String,
    status: String,
}

fn header(title: &str, width: usize) {
    println!("\n{}", title.bold().cyan());
    println!("{}\n", "=".repeat(width).cyan());
}

fn print_table<T: Tabled>(rows: Vec<T>) {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "❌ Error:".red().bold(), error);
}

pub fn display_warning(message: &str) {
    eprintln!("{} {}", "⚠️".yellow(), message);
}

pub fn display_info(message: &str) {
    println!("{} {}", "ℹ️".cyan(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

pub fn display_configuration_required(detail: &str) {
    eprintln!("\n{}", "🔑 Configuration required".bold().yellow());
    eprintln!("{}", "=".repeat(60).yellow());
    eprintln!("{}", detail);
    eprintln!("\nSet RIOT_API_KEY in your environment or in a .env file:");
    eprintln!("  {}", "RIOT_API_KEY=RGAPI-xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx".dimmed());
    eprintln!("Keys are issued at https://developer.riotgames.com\n");
}

pub fn display_profile(summoner: &SummonerDto, display_name: &str, region: &Region) {
    header(&format!("🎮 {} ({})", display_name, region), 60);
    println!("  Region:       {}", region.display_name().unwrap_or(region.id()));
    println!("  Level:        {}", summoner.summoner_level);
    println!("  Profile icon: {}", summoner.profile_icon_id);
    println!("  PUUID:        {}", summoner.puuid.dimmed());
}

pub fn display_standings(entries: &[LeagueEntryDto]) {
    header("🏆 RANKED STANDINGS", 60);

    if entries.is_empty() {
        println!("{}", "Unranked in every queue".yellow());
        return;
    }

    let rows = entries
        .iter()
        .map(|e| {
            let mut flags = Vec::new();
            if e.hot_streak {
                flags.push("🔥 hot streak");
            }
            if e.veteran {
                flags.push("veteran");
            }
            if e.fresh_blood {
                flags.push("fresh");
            }
            if e.inactive {
                flags.push("inactive");
            }
            StandingRow {
                queue: e.queue_type.clone(),
                rank: format!("{} {}", e.tier, e.rank),
                lp: e.league_points.to_string(),
                record: format!("{}W / {}L", e.wins, e.losses),
                flags: flags.join(", "),
            }
        })
        .collect();
    print_table::<StandingRow>(rows);
}

pub fn display_match_history(records: &[NormalizedMatchRecord], skipped: usize) {
    header(&format!("📊 MATCH HISTORY (Last {} Games)", records.len()), 80);

    if records.is_empty() {
        println!("{}", "No matches could be loaded".yellow());
    } else {
        let rows = records
            .iter()
            .enumerate()
            .map(|(idx, r)| {
                let result = if r.is_victory() {
                    "WIN".green().to_string()
                } else {
                    "LOSS".red().to_string()
                };
                let cs_per_min = league_insight::analysis::stats::cs_per_minute(std::slice::from_ref(r));
                MatchRow {
                    number: (idx + 1).to_string(),
                    champion: r.champion.clone(),
                    result,
                    kda_line: format!("{}/{}/{}", r.kills, r.deaths, r.assists),
                    kda: format!("{:.2}", r.kda),
                    cs_per_min: format!("{:.1}", cs_per_min),
                    duration: r.duration.clone(),
                    role: r.role.clone(),
                }
            })
            .collect();
        print_table::<MatchRow>(rows);
    }

    if skipped > 0 {
        println!(
            "{}",
            format!("{} match(es) could not be loaded and were skipped", skipped).yellow()
        );
    }
}

pub fn display_stats(stats: &AggregateStats) {
    header("📈 PERFORMANCE", 60);

    if stats.total_games == 0 {
        println!("{}", "No games played".yellow());
        return;
    }

    println!(
        "{} {} W / {} L ({:.1}% WR)",
        "Overall:".bold(),
        stats.wins.to_string().green(),
        stats.losses.to_string().red(),
        stats.win_rate
    );
    println!(
        "{} {:.2} ({:.1} / {:.1} / {:.1})",
        "Average KDA:".bold(),
        stats.average_kda,
        stats.average_kills,
        stats.average_deaths,
        stats.average_assists
    );
    println!(
        "{} {} ({} games, {:.1}% WR)",
        "Favorite:".bold(),
        stats.favorite_champion,
        stats.favorite_champion_games,
        stats.favorite_champion_win_rate
    );
    println!(
        "{} {:.1} CS  {:.1} vision  {:.0} damage",
        "Per minute:".bold(),
        stats.cs_per_minute,
        stats.vision_per_minute,
        stats.damage_per_minute
    );
}

pub fn display_champion_breakdown(champions: &[ChampionStats]) {
    if champions.is_empty() {
        return;
    }

    header("🧙 MOST PLAYED", 60);
    let rows = champions
        .iter()
        .map(|c| ChampionRow {
            champion: c.name.clone(),
            games: c.games.to_string(),
            win_rate: format!("{:.0}%", c.win_rate()),
            kda: format!("{:.1}", c.kda()),
        })
        .collect();
    print_table::<ChampionRow>(rows);
}

pub fn display_comparison(series: &[ComparisonMetric], radar: &[RadarPoint]) {
    if series.is_empty() {
        return;
    }

    header("⚖️  COMPARED TO RANK AVERAGE", 60);
    let rows = series
        .iter()
        .map(|m| {
            let you = if m.value >= m.baseline {
                m.value.to_string().green().to_string()
            } else {
                m.value.to_string().red().to_string()
            };
            ComparisonRow {
                metric: m.name.to_string(),
                you,
                baseline: m.baseline.to_string(),
            }
        })
        .collect();
    print_table::<ComparisonRow>(rows);

    let profile: Vec<String> = radar
        .iter()
        .map(|p| format!("{} {}/{}", p.stat, p.value, p.full_mark))
        .collect();
    println!("{} {}", "Play style:".bold(), profile.join(" · ").dimmed());
    println!("{}", "Rank averages are reference values, not live data".dimmed());
}

pub fn display_trend(stats: &AggregateStats) {
    if stats.trend.is_empty() {
        return;
    }

    header("📉 TREND (oldest → newest)", 60);
    let rows = stats
        .trend
        .iter()
        .map(|p| TrendRow {
            game: p.game.to_string(),
            kda: format!("{:.2}", p.kda),
            cs: p.cs.to_string(),
            damage: format!("{:.1}", p.damage),
        })
        .collect();
    print_table::<TrendRow>(rows);

    if !stats.win_rate_progression.is_empty() {
        let progression: Vec<String> = stats
            .win_rate_progression
            .iter()
            .map(|p| {
                if p.date.is_empty() {
                    format!("{}%", p.win_rate)
                } else {
                    format!("{} {}%", p.date, p.win_rate)
                }
            })
            .collect();
        println!("{} {}", "Win rate:".bold(), progression.join(" → "));
    }
}

pub fn display_ladder(rows: &[LadderRow], title: &str) {
    header(&format!("🏅 {}", title), 80);

    if rows.is_empty() {
        println!("{}", "No players match".yellow());
        return;
    }

    let table_rows = rows
        .iter()
        .map(|r| LadderTableRow {
            rank: r.rank.to_string(),
            summoner: if r.hot_streak {
                format!("{} 🔥", r.summoner_name)
            } else {
                r.summoner_name.clone()
            },
            tier: format!("{} {}", r.tier, r.division),
            lp: r.league_points.to_string(),
            win_rate: format!("{:.1}%", r.win_rate),
            games: r.games.to_string(),
        })
        .collect();
    print_table::<LadderTableRow>(table_rows);
}

pub fn display_champions(champions: &[&ChampionDto], version: &str) {
    header(&format!("📚 CHAMPIONS (patch {})", version), 80);

    if champions.is_empty() {
        println!("{}", "No champions match".yellow());
        return;
    }

    let rows = champions
        .iter()
        .map(|c| CatalogRow {
            id: c.id.clone(),
            name: c.name.clone(),
            title: c.title.clone(),
            tags: c.tags.join(", "),
        })
        .collect();
    print_table::<CatalogRow>(rows);
    println!("{} champions", champions.len());
}

pub fn display_regions(selected: &str) {
    header("🌍 REGIONS", 50);
    let rows = SUPPORTED_REGIONS
        .iter()
        .map(|(id, name, continent)| RegionRow {
            id: if *id == selected {
                format!("{} ✓", id).green().to_string()
            } else {
                id.to_string()
            },
            name: name.to_string(),
            routing: continent.to_string(),
        })
        .collect();
    print_table::<RegionRow>(rows);
}

fn recent_rows(prefs: &Preferences) -> Vec<RecentRow> {
    let tracked = prefs.tracked_players();
    prefs
        .recent_searches
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let status = if idx == 0 {
                "last lookup"
            } else if tracked.contains(name) {
                "tracked"
            } else {
                ""
            };
            RecentRow {
                number: (idx + 1).to_string(),
                player: name.clone(),
                status: status.to_string(),
            }
        })
        .collect()
}

pub fn display_recent(prefs: &Preferences) {
    header("🕘 RECENT SEARCHES", 60);

    if prefs.recent_searches.is_empty() {
        println!("{}", "No players looked up yet".yellow());
        return;
    }

    print_table(recent_rows(prefs));
    println!("{} {}", "Default region:".bold(), prefs.region);
}
