use chrono::{Datelike, Local, Utc};

use zenstudy::config::ZenConfig;
use zenstudy::core::focus::{format_time, FocusMode, FocusSession};
use zenstudy::core::habit::Habit;
use zenstudy::core::stats;
use zenstudy::remote::generate::{extract_mermaid, GenerateAction, GenerateClient, GenerateRequest};
use zenstudy::remote::keys::{self, ApiService};
use zenstudy::remote::search::{SortOption, VideoSearchClient, DEFAULT_MAX_RESULTS};
use zenstudy::remote::{QuoteSource, RemoteError};
use zenstudy::store::quote_cache::QuoteCache;
use zenstudy::store::Store;

/// Stand-in source used when no generator key is configured: every fetch
/// fails, so the cache falls back exactly as it does on a network error.
struct Unavailable(RemoteError);

impl QuoteSource for Unavailable {
    async fn fetch_quote(&self) -> Result<String, RemoteError> {
        Err(self.0.clone())
    }
}

fn setup_logging() {
    // Log to the systemd user journal (`journalctl --user -t zenstudy -f`).
    // Wrapper filters: zenstudy targets at info/debug (per toggle), everything
    // else at warn.
    struct FilteredJournal {
        inner: systemd_journal_logger::JournalLog,
    }

    impl log::Log for FilteredJournal {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            if metadata.target().starts_with("zenstudy") {
                let max = if zenstudy::debug_logging() {
                    log::LevelFilter::Debug
                } else {
                    log::LevelFilter::Info
                };
                metadata.level() <= max
            } else {
                metadata.level() <= log::LevelFilter::Warn
            }
        }
        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                self.inner.log(record);
            }
        }
        fn flush(&self) {
            self.inner.flush();
        }
    }

    match systemd_journal_logger::JournalLog::new() {
        Ok(journal) => {
            let journal = journal.with_syslog_identifier("zenstudy".to_string());
            if log::set_boxed_logger(Box::new(FilteredJournal { inner: journal })).is_ok() {
                // Global max must be Debug so debug logs can pass through when toggled.
                log::set_max_level(log::LevelFilter::Debug);
            }
        }
        Err(e) => eprintln!("Journal logging unavailable: {}", e),
    }
}

fn now_ms() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}

/// Remove `--name value` from the argument list, returning the value.
fn take_flag(args: &mut Vec<String>, name: &str) -> Option<String> {
    let pos = args.iter().position(|a| a == name)?;
    if pos + 1 >= args.len() {
        args.remove(pos);
        return None;
    }
    let value = args.remove(pos + 1);
    args.remove(pos);
    Some(value)
}

fn take_bool_flag(args: &mut Vec<String>, name: &str) -> bool {
    if let Some(pos) = args.iter().position(|a| a == name) {
        args.remove(pos);
        true
    } else {
        false
    }
}

fn usage() {
    println!("ZenStudy — learning dashboard");
    println!();
    println!("Usage: zenstudy [--debug] <command>");
    println!();
    println!("  habits list");
    println!("  habits add <name...> [--category <c>]");
    println!("  habits remove <id>");
    println!("  habits toggle <id> <day>");
    println!("  habits stats");
    println!("  quote [--refresh]");
    println!("  search <query...> [--sort relevance|viewCount|date|rating] [--max <n>]");
    println!("  notes list");
    println!("  notes search <query...>");
    println!("  notes save <video-id> <title> <content...>");
    println!("  notes delete <video-id>");
    println!("  generate <action> [--video-title <t>] [--notes <n>] [--input <i>]");
    println!("  focus [focus|short-break|long-break] [minutes]");
    println!("  keys set <gemini|youtube> <key>");
    println!("  keys clear <gemini|youtube>");
    println!("  sound on|off");
    println!("  setup [--name <n>] [--career-goal <g>] [--language <l>]");
}

#[tokio::main]
async fn main() {
    setup_logging();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let debug = take_bool_flag(&mut args, "--debug");

    let config = ZenConfig::load();
    if let Err(e) = config.ensure_files() {
        eprintln!("Failed to create data directory: {}", e);
        return;
    }
    let store = Store::open(&config);

    let settings = store.settings();
    zenstudy::set_debug_logging(debug || settings.debug_logging);

    let today = Local::now();
    let day = today.day();
    let days_in_month = stats::days_in_month(today.year(), today.month());

    match args.first().map(String::as_str) {
        Some("habits") => habits_command(&store, &mut args, day, days_in_month),
        Some("quote") => quote_command(&store, &mut args).await,
        Some("search") => search_command(&mut args).await,
        Some("notes") => notes_command(&store, &mut args),
        Some("generate") => generate_command(&store, &mut args, day).await,
        Some("focus") => focus_command(&args).await,
        Some("keys") => keys_command(&args).await,
        Some("sound") => sound_command(&store, &args),
        Some("setup") => setup_command(&store, &mut args),
        _ => usage(),
    }
}

fn habits_command(store: &Store, args: &mut Vec<String>, today: u32, days_in_month: u32) {
    match args.get(1).map(String::as_str) {
        Some("list") => {
            let habits = store.habits();
            if habits.is_empty() {
                println!("No habits tracked yet.");
                return;
            }
            for habit in &habits {
                println!(
                    "{:40} {}/{} days ({}%), streak {}  [{}]",
                    habit.name,
                    habit.completed_days.len(),
                    habit.goal,
                    habit.completion_rate(),
                    habit.current_streak(today),
                    habit.id,
                );
            }
        }
        Some("add") => {
            let category = take_flag(args, "--category");
            let name = args[2..].join(" ");
            if name.trim().is_empty() {
                println!("Habit name is required.");
                return;
            }
            let mut habits = store.habits();
            let mut habit = Habit::new(name.trim(), Habit::color_for(habits.len()), days_in_month);
            habit.category = category;
            println!("Added habit \"{}\" ({})", habit.name, habit.id);
            habits.push(habit);
            store.save_habits(&habits);
        }
        Some("remove") => {
            let Some(id) = args.get(2) else {
                println!("Habit id is required.");
                return;
            };
            let mut habits = store.habits();
            let before = habits.len();
            habits.retain(|h| &h.id != id);
            if habits.len() == before {
                println!("No habit with id {}", id);
                return;
            }
            store.save_habits(&habits);
            println!("Removed habit {}", id);
        }
        Some("toggle") => {
            let (Some(id), Some(day_arg)) = (args.get(2), args.get(3)) else {
                println!("Usage: habits toggle <id> <day>");
                return;
            };
            let Ok(day) = day_arg.parse::<u32>() else {
                println!("Day must be a number.");
                return;
            };
            if day < 1 || day > days_in_month {
                println!("Day must be between 1 and {}.", days_in_month);
                return;
            }
            let mut habits = store.habits();
            let Some(habit) = habits.iter_mut().find(|h| &h.id == id) else {
                println!("No habit with id {}", id);
                return;
            };
            habit.toggle_day(day);
            let state = if habit.completed_on(day) { "done" } else { "not done" };
            println!("{} — day {} marked {}", habit.name, day, state);
            store.save_habits(&habits);
        }
        Some("stats") => {
            let habits = store.habits();
            let today_p = stats::todays_progress(&habits, today);
            let week_p = stats::weekly_stats(&habits, today, days_in_month);
            let month_p = stats::monthly_stats(&habits);

            println!("Today:      {}/{} ({}%)", today_p.completed, today_p.total, today_p.percentage);
            println!("This week:  {}/{} ({}%)", week_p.completed, week_p.total, week_p.percentage);
            println!("This month: {}/{} ({}%)", month_p.completed, month_p.total, month_p.percentage);
            println!("Perfect days: {}", stats::perfect_days(&habits, days_in_month));

            let groups = stats::category_rollup(&habits);
            if !groups.is_empty() {
                println!("\nBy category:");
                for g in &groups {
                    println!("  {:20} {}/{} ({}%)", g.category, g.completed, g.total, g.percentage);
                }
            }

            println!("\nMost consistent:");
            for (i, r) in stats::most_consistent(&habits, 5).iter().enumerate() {
                println!("  {}. {} — {}%", i + 1, r.name, r.value);
            }

            println!("\nStreak leaders:");
            for (i, r) in stats::streak_leaders(&habits, today, 5).iter().enumerate() {
                println!("  {}. {} — {} day(s)", i + 1, r.name, r.value);
            }
        }
        _ => usage(),
    }
}

async fn quote_command(store: &Store, args: &mut Vec<String>) {
    let refresh = take_bool_flag(args, "--refresh");
    let cache = QuoteCache::new(store);
    let now = now_ms();

    let quote = match keys::resolve_key(ApiService::Gemini).await {
        Ok(key) => {
            let client = GenerateClient::new(key);
            if refresh {
                cache.change_quote(&client, now).await
            } else {
                cache.initialize(&client, now).await
            }
        }
        Err(e) => {
            log::warn!("Quote generator unavailable: {}", e);
            let source = Unavailable(e);
            if refresh {
                cache.change_quote(&source, now).await
            } else {
                cache.initialize(&source, now).await
            }
        }
    };

    println!("{}", quote.quote);
    let remaining = cache.seconds_remaining(now_ms());
    println!("(auto-refresh in {}:{:02})", remaining / 60, remaining % 60);
}

async fn search_command(args: &mut Vec<String>) {
    let sort = SortOption::parse(&take_flag(args, "--sort").unwrap_or_default());
    let max_results = take_flag(args, "--max")
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_MAX_RESULTS);
    let query = args[1..].join(" ");

    let key = match keys::resolve_key(ApiService::Youtube).await {
        Ok(key) => key,
        Err(e) => {
            println!("{}", e);
            return;
        }
    };

    let client = VideoSearchClient::new(key);
    match client.search(&query, max_results, sort).await {
        Ok(videos) if videos.is_empty() => println!("No videos found for your search"),
        Ok(videos) => {
            println!("Found {} videos\n", videos.len());
            for v in &videos {
                println!("{}  [{}]", v.title, v.duration);
                println!("    {} — {} views — {}", v.channel_name, v.views, v.published_at);
                println!("    https://www.youtube.com/watch?v={}\n", v.id);
            }
        }
        Err(e) => println!("Failed to search videos: {}", e),
    }
}

fn notes_command(store: &Store, args: &mut Vec<String>) {
    match args.get(1).map(String::as_str) {
        Some("list") => {
            let notes = store.all_notes();
            println!("{} notes", notes.len());
            for n in &notes {
                println!("\n{} ({})\n  updated {}", n.video_title, n.video_id, n.updated_at);
                println!("  {}", n.content);
            }
        }
        Some("search") => {
            let query = args[2..].join(" ");
            let notes = store.all_notes();
            let hits: Vec<_> = notes.iter().filter(|n| n.matches(&query)).collect();
            if hits.is_empty() {
                println!("No notes match your search");
                return;
            }
            for n in hits {
                println!("{} ({})\n  {}", n.video_title, n.video_id, n.content);
            }
        }
        Some("save") => {
            let (Some(video_id), Some(title)) = (args.get(2), args.get(3)) else {
                println!("Usage: notes save <video-id> <title> <content...>");
                return;
            };
            let content = args[4..].join(" ");
            store.save_note(video_id, Some(title.as_str()), &content);
            println!("Saved note for {}", video_id);
        }
        Some("delete") => {
            let Some(video_id) = args.get(2) else {
                println!("Video id is required.");
                return;
            };
            store.delete_note(video_id);
            println!("Deleted note for {}", video_id);
        }
        _ => usage(),
    }
}

async fn generate_command(store: &Store, args: &mut Vec<String>, today: u32) {
    let video_title = take_flag(args, "--video-title").unwrap_or_default();
    let existing_notes = take_flag(args, "--notes").unwrap_or_default();
    let user_input = take_flag(args, "--input").unwrap_or_default();

    let Some(action) = args.get(1).and_then(|a| GenerateAction::parse(a)) else {
        println!("Unknown action. One of: notes, summarize, expand, improve, quiz, flowchart, motivation");
        return;
    };

    let mut request = GenerateRequest::for_action(action);
    request.video_title = video_title;
    request.existing_notes = existing_notes;
    request.user_input = user_input;

    if action == GenerateAction::Motivation {
        let habits = store.habits();
        request.habit_data = Some(serde_json::json!({
            "habits": stats::habit_patterns(&habits, today),
            "skippedToday": stats::skipped_today(&habits, today),
            "currentDay": today,
        }));
    }

    let key = match keys::resolve_key(ApiService::Gemini).await {
        Ok(key) => key,
        Err(e) => {
            println!("{}", e);
            return;
        }
    };

    let client = GenerateClient::new(key);
    match client.generate(&request).await {
        Ok(text) if action == GenerateAction::Flowchart => println!("{}", extract_mermaid(&text)),
        Ok(text) => println!("{}", text),
        Err(e) if action == GenerateAction::Motivation => {
            // The motivation path never surfaces an error; fall back locally.
            log::error!("AI motivation error: {}", e);
            let skipped = stats::skipped_today(&store.habits(), today).len();
            println!("{}", stats::fallback_motivation(skipped));
        }
        Err(e) => println!("AI request failed: {}", e),
    }
}

async fn focus_command(args: &[String]) {
    let mode = match args.get(1).map(String::as_str) {
        Some("short-break") => FocusMode::ShortBreak,
        Some("long-break") => FocusMode::LongBreak,
        _ => FocusMode::Focus,
    };
    let mut session = FocusSession::new(mode);
    // Minutes may follow the mode, or stand alone after `focus`.
    let minutes = args[1..].iter().find_map(|a| a.parse::<u32>().ok());
    if let Some(minutes) = minutes {
        session.set_minutes(minutes);
    }

    println!("{} — {}", session.mode.label(), format_time(session.remaining_secs));
    session.start();

    let mut ticker = tokio::time::interval(std::time::Duration::from_secs(1));
    ticker.tick().await; // the first tick fires immediately
    loop {
        ticker.tick().await;
        let done = session.tick();
        if session.remaining_secs % 60 == 0 && !session.is_complete() {
            println!("{} remaining", format_time(session.remaining_secs));
        }
        if done {
            break;
        }
    }

    println!("{}", session.mode.completion_message());
    println!("Up next: {}", session.mode.next_mode().label());
}

async fn keys_command(args: &[String]) {
    let (Some(verb), Some(service)) = (args.get(1), args.get(2)) else {
        usage();
        return;
    };
    let Some(service) = ApiService::parse(service) else {
        println!("Unknown service. One of: gemini, youtube");
        return;
    };
    match verb.as_str() {
        "set" => {
            let Some(key) = args.get(3) else {
                println!("Usage: keys set <gemini|youtube> <key>");
                return;
            };
            match keys::store_key(service, key).await {
                Ok(()) => println!("{} API key stored", service.label()),
                Err(e) => println!("{}", e),
            }
        }
        "clear" => match keys::delete_key(service).await {
            Ok(()) => println!("{} API key cleared", service.label()),
            Err(e) => println!("{}", e),
        },
        _ => usage(),
    }
}

fn sound_command(store: &Store, args: &[String]) {
    let mut settings = store.settings();
    match args.get(1).map(String::as_str) {
        Some("on") => settings.navigation_sound = true,
        Some("off") => settings.navigation_sound = false,
        _ => {
            println!(
                "Navigation sound is {}",
                if settings.navigation_sound { "on" } else { "off" }
            );
            return;
        }
    }
    store.save_settings(&settings);
    println!(
        "Navigation sound {}",
        if settings.navigation_sound { "on" } else { "off" }
    );
}

fn setup_command(store: &Store, args: &mut Vec<String>) {
    let mut settings = store.settings();
    if let Some(name) = take_flag(args, "--name") {
        settings.display_name = Some(name);
    }
    if let Some(goal) = take_flag(args, "--career-goal") {
        settings.career_goal = Some(goal);
    }
    if let Some(language) = take_flag(args, "--language") {
        settings.preferred_language = Some(language);
    }
    settings.setup_complete = true;
    store.save_settings(&settings);
    println!("Setup saved.");
}
