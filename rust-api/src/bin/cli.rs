//! Courtside CLI - terminal dashboard for NBA stats and odds

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use courtside::client::{ApiClient, ClientConfig, PlayerQuery};
use courtside::config::DashboardConfig;
use courtside::core::consensus::{best_moneyline, calculate_consensus, BestPrice};
use courtside::core::kelly::{KellyCalculator, KellyInput, OddsFormat, QUARTER_KELLY};
use courtside::core::league;
use courtside::core::listing::{
    paginate, parse_ordering, team_filter_value, ListQuery, SortDirection, ALL, MAX_PAGE_SIZE,
    PLAYER_COLUMNS, PLAYER_SEARCH_FIELDS, TEAM_ANALYSIS_COLUMNS, TEAM_COLUMNS, TEAM_SEARCH_FIELDS,
};
use courtside::display::{
    format_american, format_average, format_range, format_stake, format_stat, truncate_name,
    PLACEHOLDER,
};
use courtside::models::{LiveOddsGame, ReportSlot};
use courtside::poll::Poller;

const DEFAULT_BANKROLL: &str = "1000";

#[derive(Parser)]
#[command(name = "courtside")]
#[command(author, version, about = "NBA stats and odds dashboard", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Run in interactive mode
    #[arg(short, long)]
    interactive: bool,

    /// Backend base URL (overrides COURTSIDE_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Refresh interval in seconds for --watch (overrides POLL_INTERVAL_SECS)
    #[arg(long)]
    interval: Option<u64>,

    /// Log requests to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Quarter-Kelly stake for a single bet
    Kelly {
        /// Win probability, strictly between 0 and 1
        #[arg(short, long)]
        probability: String,

        /// Offered price, e.g. -110, +150 or 2.5
        #[arg(short, long, allow_hyphen_values = true)]
        odds: String,

        /// Odds notation: american or decimal
        #[arg(long, default_value = "american")]
        format: OddsFormat,

        /// Bankroll amount
        #[arg(long, default_value = DEFAULT_BANKROLL)]
        bankroll: f64,
    },

    /// Live odds with cross-book consensus
    Odds {
        /// Keep refreshing until Ctrl-C
        #[arg(short, long)]
        watch: bool,

        /// Stored odds rows for one game instead of the live board
        #[arg(long, conflicts_with = "watch")]
        game: Option<String>,
    },

    /// List teams
    Teams {
        /// Case-insensitive search on name, city or abbreviation
        #[arg(short, long)]
        search: Option<String>,

        /// Eastern, Western or All
        #[arg(long, default_value = "All")]
        conference: String,

        /// Division name or All
        #[arg(long, default_value = "All")]
        division: String,

        /// Comma-separated sort columns
        #[arg(long, default_value = "full_name")]
        order_by: String,

        /// Comma-separated directions, one per column
        #[arg(long, default_value = "")]
        order_dir: String,

        /// Show season analysis (record, ratings, ATS) and allow sorting by it
        #[arg(short, long)]
        analysis: bool,
    },

    /// One team's analysis and roster
    Team {
        /// Team abbreviation, e.g. BOS
        abbreviation: String,
    },

    /// One player's profile and season averages
    Player {
        id: String,

        #[arg(long, default_value = "2024-25")]
        season: String,
    },

    /// List active players
    Players {
        #[arg(short, long)]
        search: Option<String>,

        /// Team abbreviation or All
        #[arg(long, default_value = "All")]
        team: String,

        /// Position or All
        #[arg(long, default_value = "All")]
        position: String,

        #[arg(long, default_value = "team_abbreviation,jersey_number")]
        order_by: String,

        #[arg(long, default_value = "asc,asc")]
        order_dir: String,

        #[arg(long, default_value = "50")]
        limit: usize,

        #[arg(long, default_value = "0")]
        offset: usize,
    },

    /// Today's games
    Games,

    /// Scheduled daily report (750am, 800am or 1100am)
    Report { slot: ReportSlot },

    /// Parlay recommendations and value bets
    Recommendations,

    /// Backend health and status
    Status,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = DashboardConfig::from_env().context("Failed to read configuration")?;
    if let Some(url) = &cli.api_url {
        config.api_base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(secs) = cli.interval {
        anyhow::ensure!(secs >= 1, "--interval must be at least 1 second");
        config.poll_interval_secs = secs;
    }

    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG.max(config.log_level))
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;
    }

    println!(
        "{}",
        format!("Courtside CLI v{}", env!("CARGO_PKG_VERSION"))
            .cyan()
            .bold()
    );
    println!();

    let dashboard = Dashboard::new(&config)?;

    if cli.interactive {
        run_interactive(&dashboard)?;
    } else if let Some(command) = cli.command {
        match command {
            Commands::Kelly {
                probability,
                odds,
                format,
                bankroll,
            } => {
                show_kelly(&probability, &odds, format, bankroll)?;
            }
            Commands::Odds { watch, game } => match game {
                Some(game_id) => dashboard.show_game_odds(&game_id)?,
                None if watch => dashboard.watch_odds()?,
                None => dashboard.show_odds()?,
            },
            Commands::Teams {
                search,
                conference,
                division,
                order_by,
                order_dir,
                analysis,
            } => {
                let query = ListQuery::new()
                    .search(search.unwrap_or_default(), TEAM_SEARCH_FIELDS)
                    .filter("conference", conference)
                    .filter("division", division);
                if analysis {
                    dashboard.show_team_analysis(query, &order_by, &order_dir)?;
                } else {
                    dashboard.show_teams(query, &order_by, &order_dir)?;
                }
            }
            Commands::Team { abbreviation } => {
                dashboard.show_team(&abbreviation)?;
            }
            Commands::Player { id, season } => {
                dashboard.show_player(&id, &season)?;
            }
            Commands::Players {
                search,
                team,
                position,
                order_by,
                order_dir,
                limit,
                offset,
            } => {
                let query = ListQuery::new()
                    .search(search.unwrap_or_default(), PLAYER_SEARCH_FIELDS)
                    .filter("team_abbreviation", team_filter_value(&team))
                    .filter_partial("position", position);
                dashboard.show_players(query, &order_by, &order_dir, limit, offset)?;
            }
            Commands::Games => {
                dashboard.show_games()?;
            }
            Commands::Report { slot } => {
                dashboard.show_report(slot)?;
            }
            Commands::Recommendations => {
                dashboard.show_recommendations()?;
            }
            Commands::Status => {
                dashboard.show_status()?;
            }
        }
    } else {
        println!("Use --help for usage information or --interactive for interactive mode.");
    }

    Ok(())
}

/// Client, runtime and refresh interval for one CLI session
struct Dashboard {
    client: ApiClient,
    runtime: Runtime,
    interval: Duration,
}

impl Dashboard {
    fn new(config: &DashboardConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("Failed to create tokio runtime")?;
        let client = {
            let _guard = runtime.enter();
            ApiClient::new(ClientConfig::from(config))
                .with_context(|| format!("Invalid backend URL {}", config.api_base_url))?
        };

        Ok(Self {
            client,
            runtime,
            interval: config.poll_interval(),
        })
    }

    /// Run one request behind a spinner
    fn fetch<T, F>(&self, message: &str, request: F) -> Result<T>
    where
        F: Future<Output = Result<T, courtside::ClientError>>,
    {
        let pb = spinner(message);
        let result = self.runtime.block_on(request);
        pb.finish_and_clear();
        result.with_context(|| format!("Request to {} failed", self.client.base_url()))
    }

    fn show_odds(&self) -> Result<()> {
        let odds = self.fetch("Loading live odds...", self.client.live_odds())?;
        print_odds(&odds.games);
        Ok(())
    }

    fn show_game_odds(&self, game_id: &str) -> Result<()> {
        let response = self.fetch("Loading game odds...", self.client.game_odds(game_id))?;

        if response.odds.is_empty() {
            println!("{}", format!("No stored odds for game {}.", game_id).yellow());
            return Ok(());
        }

        println!(
            "{:<18} {:<10} {:<26} {:>7} {:>7}",
            "Book", "Market", "Outcome", "Price", "Point"
        );
        println!("{}", "-".repeat(72));

        for row in &response.odds {
            let outcome = row
                .outcome_name
                .as_deref()
                .or(row.team.as_deref())
                .unwrap_or(PLACEHOLDER);
            println!(
                "{:<18} {:<10} {:<26} {:>7} {:>7}",
                truncate_name(
                    row.bookmaker_title
                        .as_deref()
                        .or(row.bookmaker_key.as_deref())
                        .unwrap_or(PLACEHOLDER),
                    18
                ),
                row.market_type.as_deref().unwrap_or(PLACEHOLDER),
                truncate_name(outcome, 26),
                row.price.map(format_american).unwrap_or_else(|| PLACEHOLDER.to_string()),
                format_stat(row.point, 1)
            );
        }
        Ok(())
    }

    fn watch_odds(&self) -> Result<()> {
        println!(
            "{} every {}s. Press Ctrl-C to stop.",
            "Watching live odds".green(),
            self.interval.as_secs()
        );
        println!();

        let client = self.client.clone();
        let interval = self.interval;

        self.runtime.block_on(async move {
            let mut poller = Poller::spawn("live-odds", interval, move || {
                let client = client.clone();
                async move { client.live_odds().await }
            });

            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    snapshot = poller.changed() => {
                        let Some(snapshot) = snapshot else { break };
                        println!(
                            "{} #{} at {}",
                            "Update".cyan(),
                            snapshot.generation,
                            snapshot.fetched_at.format("%H:%M:%S")
                        );
                        print_odds(&snapshot.data.games);
                        println!();
                    }
                }
            }

            poller.stop().await;
        });

        println!("{}", "Stopped watching.".yellow());
        Ok(())
    }

    fn show_teams(&self, mut query: ListQuery, order_by: &str, order_dir: &str) -> Result<()> {
        query.sort = parse_ordering(order_by, order_dir, TEAM_COLUMNS)?;
        let response = self.fetch("Loading teams...", self.client.teams(MAX_PAGE_SIZE, 0))?;
        let teams = query.apply(&response.teams);

        if teams.is_empty() {
            println!("{}", "No teams match.".yellow());
            return Ok(());
        }

        println!(
            "{:<5} {:<26} {:<10} {:<10}",
            "Abbr", "Team", "Conference", "Division"
        );
        println!("{}", "-".repeat(54));

        for team in &teams {
            let name = team
                .full_name
                .as_deref()
                .or(team.name.as_deref())
                .unwrap_or(PLACEHOLDER);
            let conference = team
                .conference
                .as_deref()
                .or_else(|| league::conference_of(&team.abbreviation))
                .unwrap_or(PLACEHOLDER);
            let division = team
                .division
                .as_deref()
                .or_else(|| league::division_of(&team.abbreviation))
                .unwrap_or(PLACEHOLDER);

            println!(
                "{:<5} {:<26} {:<10} {:<10}",
                team.abbreviation.bold(),
                truncate_name(name, 26),
                conference,
                division
            );
        }

        println!();
        println!("Total: {} of {} teams", teams.len(), response.teams.len());
        Ok(())
    }

    fn show_team_analysis(
        &self,
        mut query: ListQuery,
        order_by: &str,
        order_dir: &str,
    ) -> Result<()> {
        query.sort = parse_ordering(order_by, order_dir, TEAM_ANALYSIS_COLUMNS)?;
        let response = self.fetch("Loading team analysis...", self.client.teams_analysis())?;
        let teams = query.apply(&response.teams);

        if teams.is_empty() {
            println!("{}", "No teams match.".yellow());
            return Ok(());
        }

        println!(
            "{:<5} {:<24} {:>4} {:>4} {:>6} {:>6} {:>6} {:>6}",
            "Abbr", "Team", "W", "L", "Win%", "Net", "ATS%", "Str"
        );
        println!("{}", "-".repeat(68));

        for analysis in &teams {
            let team = &analysis.team;
            let season = analysis.season_stats.as_ref();
            let betting = analysis.betting_stats.as_ref();
            let name = team
                .full_name
                .as_deref()
                .or(team.name.as_deref())
                .unwrap_or(PLACEHOLDER);

            println!(
                "{:<5} {:<24} {:>4} {:>4} {:>6} {:>6} {:>6} {:>6}",
                team.abbreviation.bold(),
                truncate_name(name, 24),
                format_stat(season.and_then(|s| s.wins), 0),
                format_stat(season.and_then(|s| s.losses), 0),
                format_stat(season.and_then(|s| s.win_percentage), 3),
                format_stat(season.and_then(|s| s.net_rating), 1),
                format_stat(betting.and_then(|b| b.ats_percentage), 1),
                format_stat(analysis.strength_rating, 1)
            );
        }

        println!();
        println!("Total: {} of {} teams", teams.len(), response.teams.len());
        Ok(())
    }

    fn show_team(&self, abbreviation: &str) -> Result<()> {
        let analysis = self.fetch("Loading team...", self.client.team_analysis(abbreviation))?;
        let roster = self.fetch("Loading roster...", self.client.team_players(abbreviation))?;
        let team = &analysis.team;

        println!(
            "{} {}",
            team.abbreviation.bold(),
            team.full_name.as_deref().unwrap_or(PLACEHOLDER)
        );
        println!(
            "{} / {}",
            team.conference
                .as_deref()
                .or_else(|| league::conference_of(&team.abbreviation))
                .unwrap_or(PLACEHOLDER),
            team.division
                .as_deref()
                .or_else(|| league::division_of(&team.abbreviation))
                .unwrap_or(PLACEHOLDER)
        );
        println!();

        if let Some(season) = &analysis.season_stats {
            println!(
                "{:<16} {}-{} ({})",
                "Record",
                format_stat(season.wins, 0),
                format_stat(season.losses, 0),
                format_stat(season.win_percentage, 3)
            );
            println!(
                "{:<16} {} scored, {} allowed",
                "Points",
                format_stat(season.points_per_game, 1),
                format_stat(season.points_allowed, 1)
            );
            println!(
                "{:<16} off {} def {} net {}",
                "Ratings",
                format_stat(season.offensive_rating, 1),
                format_stat(season.defensive_rating, 1),
                format_stat(season.net_rating, 1)
            );
        }
        if let Some(form) = &analysis.recent_form {
            println!(
                "{:<16} last 10 {} home {} away {}",
                "Form",
                form.last_10.as_deref().unwrap_or(PLACEHOLDER),
                form.home_record.as_deref().unwrap_or(PLACEHOLDER),
                form.away_record.as_deref().unwrap_or(PLACEHOLDER)
            );
        }
        if let Some(betting) = &analysis.betting_stats {
            println!(
                "{:<16} ATS {} ({}%) O/U {} ({}%)",
                "Betting",
                betting.ats_record.as_deref().unwrap_or(PLACEHOLDER),
                format_stat(betting.ats_percentage, 1),
                betting.over_under.as_deref().unwrap_or(PLACEHOLDER),
                format_stat(betting.ou_percentage, 1)
            );
        }
        println!();

        let players = ListQuery::new()
            .sort_by("jersey_number", SortDirection::Asc)
            .apply(&roster.players);
        println!("{}", "Roster:".yellow().bold());
        if players.is_empty() {
            println!("{}", "  none".dimmed());
        }
        for player in &players {
            println!(
                "  {:>3} {:<24} {:<5}",
                player.jersey_number.as_deref().unwrap_or(PLACEHOLDER),
                truncate_name(&player.name, 24),
                player.position.as_deref().unwrap_or(PLACEHOLDER)
            );
        }
        Ok(())
    }

    fn show_player(&self, player_id: &str, season: &str) -> Result<()> {
        let player = self.fetch("Loading player...", self.client.player(player_id))?;
        let stats = self.fetch(
            "Loading season averages...",
            self.client.player_stats(player_id, season),
        )?;

        println!(
            "{} #{} {} {}",
            player.name.bold(),
            player.jersey_number.as_deref().unwrap_or(PLACEHOLDER),
            player.position.as_deref().unwrap_or(PLACEHOLDER),
            player.team_abbreviation.as_deref().unwrap_or(PLACEHOLDER)
        );
        println!(
            "{} / {}",
            player.height.as_deref().unwrap_or(PLACEHOLDER),
            player.weight.as_deref().unwrap_or(PLACEHOLDER)
        );
        println!();

        println!(
            "{} {}",
            "Season".green(),
            stats.season.as_deref().unwrap_or(season)
        );
        println!("{:<8} {}", "GP", format_stat(stats.games_played, 0));
        println!("{:<8} {}", "PPG", format_stat(stats.ppg, 1));
        println!("{:<8} {}", "RPG", format_stat(stats.rpg, 1));
        println!("{:<8} {}", "APG", format_stat(stats.apg, 1));
        println!("{:<8} {}", "FG%", format_stat(stats.fg_percentage, 1));
        println!("{:<8} {}", "3P%", format_stat(stats.three_point_percentage, 1));
        println!("{:<8} {}", "FT%", format_stat(stats.ft_percentage, 1));
        Ok(())
    }

    fn show_players(
        &self,
        mut query: ListQuery,
        order_by: &str,
        order_dir: &str,
        limit: usize,
        offset: usize,
    ) -> Result<()> {
        query.sort = parse_ordering(order_by, order_dir, PLAYER_COLUMNS)?;
        let upstream = PlayerQuery {
            active: Some(true),
            ..Default::default()
        };
        let players = self.fetch("Loading players...", self.client.all_players(&upstream))?;

        let selected = query.apply(&players);
        let page = paginate(&selected, Some(limit), offset);

        if page.items.is_empty() {
            println!("{}", "No players match.".yellow());
            return Ok(());
        }

        println!(
            "{:<24} {:<5} {:<5} {:>3} {:>6} {:>6}",
            "Name", "Team", "Pos", "#", "Height", "Weight"
        );
        println!("{}", "-".repeat(54));

        for player in &page.items {
            println!(
                "{:<24} {:<5} {:<5} {:>3} {:>6} {:>6}",
                truncate_name(&player.name, 24),
                player.team_abbreviation.as_deref().unwrap_or(PLACEHOLDER),
                player.position.as_deref().unwrap_or(PLACEHOLDER),
                player.jersey_number.as_deref().unwrap_or(PLACEHOLDER),
                player.height.as_deref().unwrap_or(PLACEHOLDER),
                player.weight.as_deref().unwrap_or(PLACEHOLDER)
            );
        }

        println!();
        println!(
            "Showing {}-{} of {} players",
            page.offset + 1,
            page.offset + page.count,
            page.total
        );
        Ok(())
    }

    fn show_games(&self) -> Result<()> {
        let response = self.fetch("Loading today's games...", self.client.games_today())?;

        if response.games.is_empty() {
            println!("{}", "No games today.".yellow());
            if let Some(note) = &response.note {
                println!("{}", note.dimmed());
            }
            return Ok(());
        }

        println!(
            "{:<26} {:<26} {:>9} {:<12}",
            "Away", "Home", "Score", "Status"
        );
        println!("{}", "-".repeat(76));

        for game in &response.games {
            let score = match (game.visitor_team_score, game.home_team_score) {
                (Some(away), Some(home)) => format!("{:.0}-{:.0}", away, home),
                _ => PLACEHOLDER.to_string(),
            };
            println!(
                "{:<26} {:<26} {:>9} {:<12}",
                truncate_name(&game.away_team, 26),
                truncate_name(&game.home_team, 26),
                score,
                game.status
                    .as_deref()
                    .or(game.commence_time.as_deref())
                    .unwrap_or(PLACEHOLDER)
            );
        }
        Ok(())
    }

    fn show_status(&self) -> Result<()> {
        let reachable = self.runtime.block_on(self.client.health()).is_ok();
        println!(
            "{:<16} {}",
            "Backend",
            if reachable {
                "ok".green()
            } else {
                "unreachable".red()
            }
        );

        let status = self.fetch("Loading status...", self.client.status())?;
        println!("{:<16} {}", "Status", status.status);
        println!(
            "{:<16} {}h",
            "Scrape interval",
            format_stat(status.scrape_interval_hours, 1)
        );
        if let Some(timestamp) = &status.timestamp {
            println!("{:<16} {}", "Timestamp", timestamp);
        }
        Ok(())
    }

    fn show_report(&self, slot: ReportSlot) -> Result<()> {
        let report = self.fetch("Loading report...", self.client.report(slot))?;

        println!(
            "{}: {}",
            "Report".green(),
            report.report_type.replace('_', " ").bold()
        );
        if let Some(timestamp) = &report.timestamp {
            println!("Generated {}", timestamp);
        }
        if let Some(status) = &report.status {
            println!("Status: {}", status);
        }
        println!();

        let details = serde_json::to_string_pretty(&report.details)
            .context("Failed to render report")?;
        println!("{}", details);
        Ok(())
    }

    fn show_recommendations(&self) -> Result<()> {
        let response = self.fetch(
            "Loading recommendations...",
            self.client.betting_recommendations(),
        )?;

        println!("{}", "Recommendations:".yellow().bold());
        if response.recommendations.is_empty() {
            println!("{}", "  none".dimmed());
        }
        for rec in &response.recommendations {
            println!(
                "  {} [{}] odds {} stake {}",
                rec.title.bold(),
                rec.risk.as_deref().unwrap_or(PLACEHOLDER),
                format_stat(rec.total_odds, 2),
                format_stat(rec.stake, 2)
            );
            for leg in &rec.legs {
                println!(
                    "    - {}: {} ({})",
                    leg.game,
                    leg.bet,
                    leg.odds.map(format_american).unwrap_or_else(|| PLACEHOLDER.to_string())
                );
            }
        }
        println!();

        println!("{}", "Value bets:".yellow().bold());
        println!(
            "{:<30} {:<20} {:>8} {:>8} {:>7}",
            "Game", "Bet", "Book", "Fair", "Edge"
        );
        println!("{}", "-".repeat(77));
        for bet in &response.value_bets {
            println!(
                "{:<30} {:<20} {:>8} {:>8} {:>7}",
                truncate_name(&bet.game, 30),
                truncate_name(&bet.bet, 20),
                format_stat(bet.bookmaker_odds, 2),
                format_stat(bet.fair_odds, 2),
                bet.edge
                    .map(|e| format!("{:.1}%", e))
                    .unwrap_or_else(|| PLACEHOLDER.to_string())
            );
        }
        Ok(())
    }
}

fn show_kelly(probability: &str, odds: &str, format: OddsFormat, bankroll: f64) -> Result<()> {
    let calc = KellyCalculator::new(bankroll)?;
    let input = KellyInput::parse(probability, odds, format)?;
    let sizing = calc.calculate(&input)?;

    println!(
        "{} (x{}, bankroll {:.2})",
        "Kelly sizing".green(),
        QUARTER_KELLY,
        bankroll
    );
    println!();
    println!("{:<16} {:.1}%", "Probability", sizing.probability * 100.0);
    println!("{:<16} {} ({:.3})", "Odds", input.odds, sizing.decimal_odds);
    println!("{:<16} {:.3}", "Expected value", sizing.expected_value);
    println!("{:<16} {:+.1}%", "Edge", sizing.edge * 100.0);
    println!("{:<16} {:.2}%", "Full Kelly", sizing.kelly_fraction * 100.0);

    let stake = format_stake(&sizing);
    if sizing.is_bet() {
        println!("{:<16} {}", "Stake", stake.green().bold());
    } else {
        println!("{:<16} {}", "Stake", stake.red());
    }
    Ok(())
}

fn print_odds(games: &[LiveOddsGame]) {
    if games.is_empty() {
        println!("{}", "No live odds available.".yellow());
        return;
    }

    println!(
        "{:<34} {:>6} {:>16} {:>6} {:>16} {:>6} {:>6} {:>5}",
        "Matchup", "Spread", "Range", "Total", "Range", "ML H", "ML A", "Books"
    );
    println!("{}", "-".repeat(104));

    for game in games {
        let consensus = calculate_consensus(&game.bookmakers);
        let best = best_moneyline(&game.bookmakers);
        let matchup = format!("{} @ {}", game.away_team, game.home_team);

        println!(
            "{:<34} {:>6} {:>16} {:>6} {:>16} {:>6} {:>6} {:>5}",
            truncate_name(&matchup, 34),
            format_average(&consensus.spread),
            format_range(&consensus.spread),
            format_average(&consensus.total),
            format_range(&consensus.total),
            format_average(&consensus.moneyline_home),
            format_average(&consensus.moneyline_away),
            consensus.bookmakers
        );
        println!(
            "{:<34} {}  {}",
            "",
            format!("best home {}", best_price(best.home.as_ref())).dimmed(),
            format!("best away {}", best_price(best.away.as_ref())).dimmed()
        );
        println!(
            "{:<34} {}  {}",
            "",
            format!(
                "spread prices {}/{}",
                format_average(&consensus.spread_home),
                format_average(&consensus.spread_away)
            )
            .dimmed(),
            format!(
                "over/under {}/{}",
                format_average(&consensus.total_over),
                format_average(&consensus.total_under)
            )
            .dimmed()
        );
    }
}

fn best_price(price: Option<&BestPrice>) -> String {
    match price {
        Some(p) => format!("{} ({})", format_american(p.price), p.bookmaker),
        None => PLACEHOLDER.to_string(),
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn run_interactive(dashboard: &Dashboard) -> Result<()> {
    println!("{}", "Interactive mode".green().bold());
    println!("Select Quit to exit.\n");

    let theme = ColorfulTheme::default();

    loop {
        let options = vec![
            "Kelly calculator",
            "Live odds",
            "Teams",
            "Players",
            "Today's games",
            "Recommendations",
            "Quit",
        ];

        let selection = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(&options)
            .default(0)
            .interact()?;

        // Errors from a single action are shown and the menu continues
        let result = match selection {
            0 => {
                let probability: String = Input::with_theme(&theme)
                    .with_prompt("Win probability (0-1)")
                    .interact_text()?;

                let format = match Select::with_theme(&theme)
                    .with_prompt("Odds format")
                    .items(&["American", "Decimal"])
                    .default(0)
                    .interact()?
                {
                    1 => OddsFormat::Decimal,
                    _ => OddsFormat::American,
                };

                let odds: String = Input::with_theme(&theme)
                    .with_prompt("Odds")
                    .interact_text()?;

                let bankroll: f64 = Input::with_theme(&theme)
                    .with_prompt("Bankroll")
                    .default(1_000.0)
                    .interact_text()?;

                println!();
                show_kelly(&probability, &odds, format, bankroll)
            }
            1 => {
                println!();
                dashboard.show_odds()
            }
            2 => {
                let conference = league_choice(&theme, "Conference", &["Eastern", "Western"])?;
                let search: String = Input::with_theme(&theme)
                    .with_prompt("Search (blank for all)")
                    .allow_empty(true)
                    .interact_text()?;

                let query = ListQuery::new()
                    .search(search, TEAM_SEARCH_FIELDS)
                    .filter("conference", conference);
                println!();
                dashboard.show_teams(query, "full_name", "")
            }
            3 => {
                let search: String = Input::with_theme(&theme)
                    .with_prompt("Search (blank for all)")
                    .allow_empty(true)
                    .interact_text()?;

                let query = ListQuery::new().search(search, PLAYER_SEARCH_FIELDS);
                println!();
                dashboard.show_players(query, "name", "asc", 25, 0)
            }
            4 => {
                println!();
                dashboard.show_games()
            }
            5 => {
                println!();
                dashboard.show_recommendations()
            }
            _ => {
                println!("Goodbye!");
                break;
            }
        };

        if let Err(e) = result {
            println!("{}: {:#}", "Error".red(), e);
        }
        println!();
    }

    Ok(())
}

/// Pick one of `values` or the All sentinel
fn league_choice(theme: &ColorfulTheme, prompt: &str, values: &[&str]) -> Result<String> {
    let mut items = vec![ALL];
    items.extend_from_slice(values);

    let selection = Select::with_theme(theme)
        .with_prompt(prompt)
        .items(&items)
        .default(0)
        .interact()?;

    Ok(items[selection].to_string())
}
