//! REPL command parsing and the thin view layer over the Store.
//!
//! Every handler reads Store state or calls exactly the Store mutations the
//! command names; invalid input surfaces as a usage hint, never as an error
//! from the Store itself.

use chrono::{Datelike, Local, NaiveDate, NaiveTime};
use rustyline::DefaultEditor;
use tokio::sync::mpsc::UnboundedReceiver;

use solace_assistant::Companion;
use solace_core::{
    HabitCategory, JournalPatch, Mood, NewTodo, Sender, SleepQuality, StoreChange, WellnessStore,
};
use solace_memory::PersistenceBridge;

pub struct App {
    pub store: WellnessStore,
    pub companion: Companion,
    pub bridge: Option<PersistenceBridge>,
    pub changes: UnboundedReceiver<StoreChange>,
}

impl App {
    /// Drain pending change events into the Persistence Bridge.
    pub async fn flush(&mut self) {
        while let Ok(change) = self.changes.try_recv() {
            if let Some(bridge) = &self.bridge {
                bridge.persist(&self.store, change).await;
            }
        }
    }
}

pub async fn dispatch(app: &mut App, input: &str, rl: &mut DefaultEditor) {
    let mut parts = input.split_whitespace();
    let command = parts.next().unwrap_or_default();
    let rest: Vec<&str> = parts.collect();

    match command {
        "help" => print_help(),
        "status" | "summary" => status(app),
        "today" => today(app, &rest),
        "mood" => mood(app, &rest),
        "habit" => habit(app, &rest),
        "todo" => todo(app, &rest),
        "sleep" => sleep(app, &rest),
        "journal" => journal(app, &rest, rl),
        "calendar" => calendar(app, &rest),
        "chat" => chat(app, &rest).await,
        "checkin" => checkin(app, &rest, rl).await,
        _ => println!("Unknown command '{}'. Type 'help'.", command),
    }
}

fn print_help() {
    println!(
        "\
  today <mood>                      set today's mood without logging history
  mood [<mood> [note...]]           log a mood entry / show mood history
  habit add <name...> [@category]   add a habit
  habit done <n> | rm <n> | list    toggle / delete / list habits
  todo add <title...> [@category]   add a todo (also mirrors a habit)
  todo done <n> | list              toggle / list todos
  sleep log <date> <bed> <wake> <quality>
  sleep list                        e.g. sleep log 2026-08-06 23:30 07:00 good
  journal add <title...>            new entry (content prompted)
  journal show|edit|rm <n> | list
  calendar [YYYY-MM]                month view of logged days
  chat <message...>                 talk to the companion
  checkin <message...>              mood + suggested todos from a message
  status                            today at a glance
  quit

  moods: great good okay poor awful    categories: @health @exercise @mindfulness @productivity @social"
    );
}

// ============================================================================
// Mood
// ============================================================================

fn today(app: &mut App, args: &[&str]) {
    let Some(mood) = args.first().and_then(|a| Mood::parse(a)) else {
        println!("usage: today <great|good|okay|poor|awful>");
        return;
    };
    app.store.set_today_mood(mood);
    println!("Today marked as {}.", mood);
}

fn mood(app: &mut App, args: &[&str]) {
    let Some(label) = args.first() else {
        if app.store.moods().is_empty() {
            println!("No mood entries yet.");
            return;
        }
        for entry in app.store.moods() {
            let local = entry.timestamp.with_timezone(&Local);
            match &entry.note {
                Some(note) => println!("  {}  {:<5}  {}", local.format("%Y-%m-%d %H:%M"), entry.mood, note),
                None => println!("  {}  {}", local.format("%Y-%m-%d %H:%M"), entry.mood),
            }
        }
        return;
    };
    let Some(mood) = Mood::parse(label) else {
        println!("'{}' is not a mood. Try: great good okay poor awful", label);
        return;
    };
    let note = if args.len() > 1 {
        Some(args[1..].join(" "))
    } else {
        None
    };
    app.store.add_mood_entry(mood, note);
    println!("Logged {}.", mood);
}

// ============================================================================
// Habits
// ============================================================================

fn habit(app: &mut App, args: &[&str]) {
    match args.first().copied() {
        None | Some("list") => list_habits(app),
        Some("add") => {
            let (name, category) = name_and_category(&args[1..]);
            if name.is_empty() {
                println!("usage: habit add <name...> [@category]");
                return;
            }
            let before = app.store.habits().len();
            app.store.add_habit(&name, category);
            if app.store.habits().len() == before {
                println!("A habit named '{}' already exists.", name);
            } else {
                println!("Added habit '{}' ({}).", name, category);
            }
        }
        Some("done") => {
            let Some(id) = nth_id(args.get(1), app.store.habits().iter().map(|h| h.id)) else {
                println!("usage: habit done <n>  (see 'habit list')");
                return;
            };
            app.store.toggle_habit(id);
            list_habits(app);
        }
        Some("rm") => {
            let Some(id) = nth_id(args.get(1), app.store.habits().iter().map(|h| h.id)) else {
                println!("usage: habit rm <n>  (see 'habit list')");
                return;
            };
            app.store.delete_habit(id);
            println!("Removed.");
        }
        Some(other) => println!("Unknown habit subcommand '{}'.", other),
    }
}

fn list_habits(app: &App) {
    if app.store.habits().is_empty() {
        println!("No habits yet. Try 'habit add Stretch @exercise'.");
        return;
    }
    for (i, habit) in app.store.habits().iter().enumerate() {
        let mark = if habit.completed { "x" } else { " " };
        println!(
            "  {:>2}. [{}] {:<30} {:<12} streak {}",
            i + 1,
            mark,
            habit.name,
            format!("({})", habit.category),
            habit.streak
        );
    }
}

// ============================================================================
// Todos
// ============================================================================

fn todo(app: &mut App, args: &[&str]) {
    match args.first().copied() {
        None | Some("list") => list_todos(app),
        Some("add") => {
            let (title, category) = name_and_category(&args[1..]);
            if title.is_empty() {
                println!("usage: todo add <title...> [@category]");
                return;
            }
            app.store.add_todos(vec![NewTodo { title, category }]);
            println!("Added (and mirrored into habits).");
        }
        Some("done") => {
            let Some(id) = nth_id(args.get(1), app.store.todos().iter().map(|t| t.id)) else {
                println!("usage: todo done <n>  (see 'todo list')");
                return;
            };
            app.store.toggle_todo(id);
            list_todos(app);
        }
        Some(other) => println!("Unknown todo subcommand '{}'.", other),
    }
}

fn list_todos(app: &App) {
    if app.store.todos().is_empty() {
        println!("No todos yet.");
        return;
    }
    for (i, todo) in app.store.todos().iter().enumerate() {
        let mark = if todo.completed { "x" } else { " " };
        println!("  {:>2}. [{}] {} ({})", i + 1, mark, todo.title, todo.category);
    }
}

// ============================================================================
// Sleep
// ============================================================================

fn sleep(app: &mut App, args: &[&str]) {
    match args.first().copied() {
        None | Some("list") => {
            if app.store.sleep().is_empty() {
                println!("No sleep entries yet.");
                return;
            }
            for entry in app.store.sleep() {
                println!(
                    "  {}  {} -> {}  {}h{:02}m  {}",
                    entry.date,
                    entry.bedtime.format("%H:%M"),
                    entry.wake_time.format("%H:%M"),
                    entry.duration_minutes / 60,
                    entry.duration_minutes % 60,
                    entry.quality
                );
            }
        }
        Some("log") => {
            let (Some(date), Some(bed), Some(wake), Some(quality)) = (
                args.get(1).and_then(|a| a.parse::<NaiveDate>().ok()),
                args.get(2).and_then(|a| parse_time(a)),
                args.get(3).and_then(|a| parse_time(a)),
                args.get(4).and_then(|a| SleepQuality::parse(a)),
            ) else {
                println!("usage: sleep log <YYYY-MM-DD> <HH:MM> <HH:MM> <poor|fair|good|excellent>");
                return;
            };
            app.store.add_sleep_entry(date, bed, wake, quality);
            let entry = &app.store.sleep()[0];
            println!(
                "Logged {}h{:02}m for {} (replaces any earlier entry for that date).",
                entry.duration_minutes / 60,
                entry.duration_minutes % 60,
                date
            );
        }
        Some(other) => println!("Unknown sleep subcommand '{}'.", other),
    }
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M").ok()
}

// ============================================================================
// Journal
// ============================================================================

fn journal(app: &mut App, args: &[&str], rl: &mut DefaultEditor) {
    match args.first().copied() {
        None | Some("list") => {
            if app.store.journal().is_empty() {
                println!("No journal entries yet.");
                return;
            }
            for (i, entry) in app.store.journal().iter().enumerate() {
                let mood = entry
                    .mood
                    .map(|m| format!("  [{}]", m))
                    .unwrap_or_default();
                println!("  {:>2}. {}  {}{}", i + 1, entry.date, entry.title, mood);
            }
        }
        Some("add") => {
            let title = args[1..].join(" ");
            if title.is_empty() {
                println!("usage: journal add <title...>");
                return;
            }
            let content = prompt(rl, "content> ").unwrap_or_default();
            let mood = prompt(rl, "mood (optional)> ").and_then(|m| Mood::parse(&m));
            app.store
                .add_journal_entry(&title, &content, Local::now().date_naive(), mood);
            println!("Saved '{}'.", title);
        }
        Some("show") => {
            let Some(i) = nth_index(args.get(1), app.store.journal().len()) else {
                println!("usage: journal show <n>");
                return;
            };
            let entry = &app.store.journal()[i];
            println!("# {}  ({})", entry.title, entry.date);
            if let Some(mood) = entry.mood {
                println!("mood: {}", mood);
            }
            println!("{}", entry.content);
        }
        Some("edit") => {
            let Some(i) = nth_index(args.get(1), app.store.journal().len()) else {
                println!("usage: journal edit <n>");
                return;
            };
            let id = app.store.journal()[i].id;
            println!("Blank keeps the current value.");
            let title = prompt(rl, "title> ").filter(|t| !t.is_empty());
            let content = prompt(rl, "content> ").filter(|c| !c.is_empty());
            let mood = prompt(rl, "mood> ").and_then(|m| Mood::parse(&m));
            app.store.update_journal_entry(
                id,
                JournalPatch {
                    title,
                    content,
                    date: None,
                    mood,
                },
            );
            println!("Updated.");
        }
        Some("rm") => {
            let Some(i) = nth_index(args.get(1), app.store.journal().len()) else {
                println!("usage: journal rm <n>");
                return;
            };
            let id = app.store.journal()[i].id;
            app.store.delete_journal_entry(id);
            println!("Deleted.");
        }
        Some(other) => println!("Unknown journal subcommand '{}'.", other),
    }
}

// ============================================================================
// Calendar
// ============================================================================

fn calendar(app: &App, args: &[&str]) {
    let today = Local::now().date_naive();
    let (year, month) = match args.first() {
        Some(arg) => {
            let mut it = arg.splitn(2, '-');
            match (
                it.next().and_then(|y| y.parse::<i32>().ok()),
                it.next().and_then(|m| m.parse::<u32>().ok()),
            ) {
                (Some(y), Some(m)) if (1..=12).contains(&m) => (y, m),
                _ => {
                    println!("usage: calendar [YYYY-MM]");
                    return;
                }
            }
        }
        None => (today.year(), today.month()),
    };

    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        println!("usage: calendar [YYYY-MM]");
        return;
    };
    let days = days_in_month(year, month);

    println!("      {}", first.format("%B %Y"));
    println!("  Mo  Tu  We  Th  Fr  Sa  Su");
    let mut line = "    ".repeat(first.weekday().num_days_from_monday() as usize);
    for day in 1..=days {
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            continue;
        };
        line.push_str(&format!(" {:>2}{}", day, day_marker(app, date)));
        if date.weekday().num_days_from_monday() == 6 {
            println!("{}", line);
            line.clear();
        }
    }
    if !line.is_empty() {
        println!("{}", line);
    }
    println!("  * mood   ~ sleep   \" journal");
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next.and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(30)
}

fn day_marker(app: &App, date: NaiveDate) -> char {
    let has_mood = app
        .store
        .moods()
        .iter()
        .any(|m| m.timestamp.with_timezone(&Local).date_naive() == date);
    if has_mood {
        return '*';
    }
    if app.store.sleep().iter().any(|s| s.date == date) {
        return '~';
    }
    if app.store.journal().iter().any(|j| j.date == date) {
        return '"';
    }
    ' '
}

// ============================================================================
// Companion
// ============================================================================

async fn chat(app: &mut App, args: &[&str]) {
    let message = args.join(" ");
    if message.is_empty() {
        println!("usage: chat <message...>");
        return;
    }

    // The transcript the backend sees ends just before the new message.
    let reply = app.companion.respond(app.store.chat(), &message).await;
    app.store.add_chat_message(Sender::User, message);
    app.store.add_chat_message(Sender::Bot, reply.clone());

    println!("\n{}\n", reply);
    offline_banner(app);
}

async fn checkin(app: &mut App, args: &[&str], rl: &mut DefaultEditor) {
    let message = args.join(" ");
    if message.is_empty() {
        println!("usage: checkin <message...>");
        return;
    }

    let classification = app.companion.classify(&message).await;
    app.store.add_mood_entry(classification.mood, Some(message));
    println!("Mood logged as {}.", classification.mood);
    offline_banner(app);

    println!("Suggestions:");
    for todo in &classification.todos {
        println!("  - {} ({})", todo.title, todo.category);
    }
    let accept = prompt(rl, "add these as todos? [Y/n] ")
        .map(|a| !a.eq_ignore_ascii_case("n"))
        .unwrap_or(true);
    if accept {
        let items = classification
            .todos
            .into_iter()
            .map(|t| NewTodo {
                title: t.title,
                category: t.category,
            })
            .collect();
        app.store.add_todos(items);
        println!("Added (todos mirror into habits).");
    }
}

fn offline_banner(app: &App) {
    if let Some(err) = app.companion.last_error() {
        println!("  [companion is offline, a local reply was used: {}]", err);
    }
}

// ============================================================================
// Small helpers
// ============================================================================

fn status(app: &App) {
    match app.store.today_mood() {
        Some(mood) => println!("Today's mood: {}", mood),
        None => println!("Today's mood: not set (try 'today okay' or 'checkin ...')"),
    }
    let done = app.store.habits().iter().filter(|h| h.completed).count();
    println!("Habits: {}/{} done today", done, app.store.habits().len());
    let open = app.store.todos().iter().filter(|t| !t.completed).count();
    println!("Todos: {} open", open);
    if let Some(sleep) = app.store.sleep().first() {
        println!(
            "Last sleep: {} ({}h{:02}m, {})",
            sleep.date,
            sleep.duration_minutes / 60,
            sleep.duration_minutes % 60,
            sleep.quality
        );
    }
    println!("Journal entries: {}", app.store.journal().len());
}

/// `["Morning", "walk", "@exercise"]` -> `("Morning walk", Exercise)`.
/// Category defaults to health when no trailing `@category` is given.
fn name_and_category(args: &[&str]) -> (String, HabitCategory) {
    if let Some((last, init)) = args.split_last() {
        if let Some(stripped) = last.strip_prefix('@') {
            if let Some(category) = HabitCategory::parse(stripped) {
                return (init.join(" "), category);
            }
        }
    }
    (args.join(" "), HabitCategory::default())
}

/// 1-based index argument -> the nth id of a collection.
fn nth_id(arg: Option<&&str>, mut ids: impl Iterator<Item = uuid::Uuid>) -> Option<uuid::Uuid> {
    let n: usize = arg?.parse().ok()?;
    ids.nth(n.checked_sub(1)?)
}

fn nth_index(arg: Option<&&str>, len: usize) -> Option<usize> {
    let n: usize = arg?.parse().ok()?;
    let i = n.checked_sub(1)?;
    (i < len).then_some(i)
}

fn prompt(rl: &mut DefaultEditor, label: &str) -> Option<String> {
    rl.readline(label)
        .ok()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
}
