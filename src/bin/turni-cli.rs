#![forbid(unsafe_code)]
use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate, Utc};
use clap::{ArgAction, Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use turni::{
    access::{self, Section, DOCUMENTS},
    attendance::{self, MonthReport},
    editor::{create_template, matching_preset, EditorError, TemplateEditor},
    generator::{generate_shift, next_monday, todays_shift},
    grid::{row_key_for, Grid},
    io as tio,
    model::{AdminLevel, CellField, Collaborator, DayKey, PresetId, ShiftId, TemplateId, TimePreset},
    render::{
        page, rows_for_grid, rows_for_roster, DaySelector, DayView, GridRenderer, HtmlGrid,
        RowInfo, Selection, SummaryView, TextGrid, Viewport,
    },
    storage::{load_or_default, save_best_effort, JsonDocumentStore},
    store::{AppState, Store},
    time::{self, format_hours_minutes, time_slots},
    timeclock, Position, Settings,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de gestion des plannings du personnel (document JSON unique)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Document d'état JSON (sinon réglages, sinon répertoire de données)
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// Fichier de réglages JSON
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Username pour l'identification
    #[arg(long, global = true)]
    user: Option<String>,

    #[arg(long, global = true)]
    password: Option<String>,

    /// Ne pas demander de confirmation avant une suppression
    #[arg(long, short = 'y', global = true)]
    yes: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Collaborateurs
    User {
        #[command(subcommand)]
        cmd: UserCmd,
    },
    /// Presets horaires
    Preset {
        #[command(subcommand)]
        cmd: PresetCmd,
    },
    /// Modèles de semaine
    Template {
        #[command(subcommand)]
        cmd: TemplateCmd,
    },
    /// Générer un planning à partir d'un modèle
    Generate {
        #[arg(long)]
        template: String,
        #[arg(long)]
        name: String,
        /// Lundi de début (YYYY-MM-DD) ; par défaut le prochain lundi
        #[arg(long)]
        start: Option<NaiveDate>,
    },
    /// Plannings générés
    Shifts {
        #[command(subcommand)]
        cmd: ShiftsCmd,
    },
    /// Afficher un planning généré
    View {
        #[arg(long)]
        shift: String,
        /// Jour (lunedi..domenica) ou `riepilogo`
        #[arg(long)]
        day: Option<String>,
        /// Limiter aux usernames donnés
        #[arg(long, value_delimiter = ',')]
        only: Vec<String>,
        /// Premier créneau visible
        #[arg(long, default_value_t = 0)]
        offset: usize,
        /// Écrire une page HTML au lieu du rendu texte
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Planning du jour de l'utilisateur connecté
    Today,
    /// Pointages
    Clock {
        #[command(subcommand)]
        cmd: ClockCmd,
    },
    /// Présences mensuelles
    Attendance {
        /// Mois (YYYY-MM) ; par défaut le mois courant
        #[arg(long)]
        month: Option<String>,
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Matrice d'accès
    Access {
        #[command(subcommand)]
        cmd: AccessCmd,
    },
    /// Documents de référence
    Docs,
    /// Profil de l'utilisateur connecté
    Profile,
    /// Export JSON du document complet
    Export {
        #[arg(long)]
        out: PathBuf,
    },
    /// Réglages locaux (sans identification)
    Config {
        #[command(subcommand)]
        cmd: ConfigCmd,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCmd {
    /// Afficher les réglages effectifs
    Show,
    /// Écrire le fichier de réglages ; seules les valeurs données changent
    Set {
        #[arg(long)]
        state_path: Option<PathBuf>,
        #[arg(long)]
        visible_slots: Option<usize>,
        #[arg(long, action = ArgAction::Set)]
        show_summary: Option<bool>,
        #[arg(long)]
        contract_hours: Option<f64>,
    },
}

#[derive(Subcommand, Debug)]
enum UserCmd {
    Add {
        #[arg(long)]
        username: String,
        #[arg(long)]
        nome: String,
        #[arg(long, default_value = "")]
        cognome: String,
        #[arg(long, default_value = "")]
        password: String,
        /// sala | bar | cucina
        #[arg(long, default_value = "sala")]
        posizione: String,
        /// 0 utente, 1 manager, 2 boss
        #[arg(long, default_value_t = 0)]
        livello: u8,
        #[arg(long, default_value_t = 40.0)]
        ore: f64,
        #[arg(long, default_value = "full-time")]
        contratto: String,
        /// Compte sans ligne dans les grilles
        #[arg(long)]
        non_collaboratore: bool,
        #[arg(long, default_value = "")]
        note: String,
    },
    List,
    Delete {
        #[arg(long)]
        username: String,
    },
    /// Import CSV `username,nome,cognome[,posizione][,collaboratore][,livello][,ore_contratto][,password]`
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum PresetCmd {
    Add {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        in1: String,
        #[arg(long)]
        out1: String,
        #[arg(long, default_value = "")]
        in2: String,
        #[arg(long, default_value = "")]
        out2: String,
    },
    List,
    Delete {
        #[arg(long)]
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum TemplateCmd {
    Create {
        #[arg(long)]
        name: String,
    },
    List,
    Show {
        #[arg(long)]
        template: String,
        #[arg(long)]
        day: Option<String>,
        #[arg(long, default_value_t = 0)]
        offset: usize,
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Appliquer un preset à une cellule
    Apply {
        #[arg(long)]
        template: String,
        #[arg(long)]
        row: String,
        #[arg(long)]
        day: String,
        #[arg(long)]
        preset: String,
    },
    /// Vider une cellule
    Clear {
        #[arg(long)]
        template: String,
        #[arg(long)]
        row: String,
        #[arg(long)]
        day: String,
    },
    /// Saisie directe d'un champ (in1, out1, in2, out2, ruolo)
    Set {
        #[arg(long)]
        template: String,
        #[arg(long)]
        row: String,
        #[arg(long)]
        day: String,
        #[arg(long)]
        field: String,
        #[arg(long, default_value = "")]
        value: String,
    },
    Rename {
        #[arg(long)]
        template: String,
        #[arg(long)]
        name: String,
    },
    Duplicate {
        #[arg(long)]
        template: String,
    },
    Delete {
        #[arg(long)]
        template: String,
    },
}

#[derive(Subcommand, Debug)]
enum ShiftsCmd {
    List,
    Delete {
        #[arg(long)]
        shift: String,
    },
}

#[derive(Subcommand, Debug)]
enum ClockCmd {
    /// Enregistrer le pointage d'un jour
    Set {
        /// YYYY-MM-DD ; par défaut aujourd'hui
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long = "in", default_value = "")]
        clock_in: String,
        #[arg(long = "out", default_value = "")]
        clock_out: String,
    },
    /// Pointages du mois et proposition pour aujourd'hui
    Show {
        #[arg(long)]
        month: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum AccessCmd {
    Show,
    Set {
        #[arg(long)]
        section: String,
        /// 0 utente, 1 manager, 2 boss
        #[arg(long)]
        role: u8,
        #[arg(long, action = ArgAction::Set)]
        allow: bool,
    },
}

impl Commands {
    fn section(&self) -> Section {
        match self {
            Commands::User { .. } => Section::Collaborators,
            Commands::Preset { .. } | Commands::Template { .. } => Section::Templates,
            Commands::Generate { .. } => Section::ShiftGenerator,
            Commands::Shifts { .. } | Commands::View { .. } => Section::ShiftViewer,
            Commands::Today | Commands::Docs => Section::Home,
            Commands::Clock { .. } => Section::TimeClock,
            Commands::Attendance { .. } => Section::Attendance,
            Commands::Access { .. } | Commands::Export { .. } => Section::Permissions,
            Commands::Profile | Commands::Config { .. } => Section::Profile,
        }
    }
}

/// Utilisateur identifié ; sans username quand le document n'a encore aucun compte.
struct Session {
    level: AdminLevel,
    username: Option<String>,
}

impl Session {
    fn username(&self) -> Result<&str> {
        self.username
            .as_deref()
            .context("this command needs a logged-in user (--user/--password)")
    }
}

fn login(state: &AppState, user: Option<&str>, password: Option<&str>) -> Result<Session> {
    if state.users.is_empty() {
        tracing::warn!("no users yet, running with full rights to bootstrap the document");
        return Ok(Session {
            level: AdminLevel::Boss,
            username: None,
        });
    }
    let username = user.context("--user is required")?;
    let found = access::authenticate(&state.users, username, password.unwrap_or(""))?;
    Ok(Session {
        level: found.admin_level,
        username: Some(found.username.clone()),
    })
}

fn confirm(yes: bool, prompt: &str) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    eprint!("{prompt} [s/N] ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(
        line.trim().to_lowercase().as_str(),
        "s" | "si" | "sì" | "y" | "yes"
    ))
}

fn parse_day(raw: &str) -> Result<DayKey> {
    DayKey::parse(raw).with_context(|| format!("invalid day: {raw}"))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn main() -> Result<()> {
    let Cli {
        log,
        state,
        config,
        user,
        password,
        yes,
        cmd,
    } = Cli::parse();

    #[cfg(feature = "logging")]
    if log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }
    #[cfg(not(feature = "logging"))]
    let _ = log;

    let settings = Settings::load(config.as_deref())?;
    // réglages locaux : ni document ni identification
    let cmd = match cmd {
        Commands::Config { cmd } => {
            run_config(cmd, settings, config.as_deref())?;
            std::process::exit(0);
        }
        other => other,
    };
    let state_path = state.unwrap_or_else(|| settings.resolved_state_path());
    ensure_parent(&state_path)?;
    let storage = JsonDocumentStore::open(&state_path);
    let mut store = Store::new(load_or_default(&storage));

    let session = login(store.state(), user.as_deref(), password.as_deref())?;
    let section = cmd.section();
    if !access::can_access(session.level, section, &store.state().access_matrix) {
        bail!("access denied to section `{}`", section.label());
    }

    let changed = run(cmd, &mut store, &session, &settings, yes)?;

    let code = if changed && !save_best_effort(&storage, store.state()) {
        eprintln!("warning: changes could not be saved to {}", state_path.display());
        // Code 2 = WARNING/INCOMPLETE
        2
    } else {
        0
    };
    std::process::exit(code);
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display())),
        _ => Ok(()),
    }
}

/// Exécute une commande ; renvoie `true` si le document doit être réécrit.
fn run(cmd: Commands, store: &mut Store, session: &Session, settings: &Settings, yes: bool) -> Result<bool> {
    match cmd {
        Commands::User { cmd } => run_user(cmd, store, yes),
        Commands::Preset { cmd } => run_preset(cmd, store, yes),
        Commands::Template { cmd } => run_template(cmd, store, settings, yes),
        Commands::Generate {
            template,
            name,
            start,
        } => {
            let start = start.unwrap_or_else(|| next_monday(today()));
            let shift = generate_shift(
                &store.state().templates,
                &TemplateId::new(&template),
                &name,
                start,
                Utc::now(),
            )?;
            println!(
                "{} | {} | {} → {}",
                shift.id, shift.name, shift.start_date, shift.end_date
            );
            store.add_generated_shift(shift);
            Ok(true)
        }
        Commands::Shifts { cmd } => match cmd {
            ShiftsCmd::List => {
                let mut shifts: Vec<_> = store.state().generated_shifts.iter().collect();
                shifts.sort_by(|a, b| b.start_date.cmp(&a.start_date));
                for s in shifts {
                    println!(
                        "{} | {} | {} → {} | {}",
                        s.id, s.name, s.start_date, s.end_date, s.template_name
                    );
                }
                Ok(false)
            }
            ShiftsCmd::Delete { shift } => {
                let id = ShiftId::new(&shift);
                if store.find_shift(&id).is_none() {
                    bail!("unknown shift: {shift}");
                }
                if !confirm(yes, "Eliminare questo turno?")? {
                    println!("Annullato");
                    return Ok(false);
                }
                store.delete_generated_shift(&id)?;
                Ok(true)
            }
        },
        Commands::View {
            shift,
            day,
            only,
            offset,
            html,
        } => {
            let shift = store
                .find_shift(&ShiftId::new(&shift))
                .with_context(|| format!("unknown shift: {shift}"))?;
            let filter = (!only.is_empty()).then_some(only.as_slice());
            let rows = rows_for_grid(&shift.grid, &store.state().users, filter);
            let selection = select(day.as_deref(), settings)?;
            let out = render(
                &shift.grid,
                &rows,
                selection,
                Some(shift.start_date),
                offset,
                settings.visible_slots,
                html.as_deref(),
                &shift.name,
            )?;
            print!("{out}");
            Ok(false)
        }
        Commands::Today => {
            let username = session.username()?;
            let user = store
                .find_user(username)
                .with_context(|| format!("unknown user: {username}"))?;
            let key = row_key_for(user).key;
            let date = today();
            match todays_shift(&store.state().generated_shifts, &key, date) {
                Some(shift) => {
                    let cell = shift.grid.cell(&key, timeclock::day_key_for(date));
                    let segments: Vec<String> = cell
                        .segments()
                        .map(|(i, o)| format!("{i} - {o}"))
                        .collect();
                    if segments.is_empty() {
                        println!("{}: riposo", shift.name);
                    } else {
                        println!(
                            "{}: {} ({})",
                            shift.name,
                            segments.join(" / "),
                            time::cell_hours_hm(cell)
                        );
                    }
                }
                None => println!("Nessun turno per oggi"),
            }
            Ok(false)
        }
        Commands::Clock { cmd } => run_clock(cmd, store, session),
        Commands::Attendance { month, csv } => {
            let now = today();
            let month = month.unwrap_or_else(|| timeclock::month_key(now));
            let (y, m) = timeclock::parse_month_key(&month)
                .with_context(|| format!("invalid month: {month}"))?;
            let report = MonthReport::build(&store.state().users, &store.state().time_entries, y, m);
            println!(
                "Mesi disponibili: {}",
                attendance::available_months(&store.state().time_entries, now).join(", ")
            );
            for user in &report.users {
                println!("\n{} ({})", user.full_name, format_hours_minutes(user.total_minutes()));
                for day in &user.days {
                    println!(
                        "{} | {:>5} | {:>5} | {:>7} | {}",
                        day.date,
                        or_dash(day.clock_in()),
                        or_dash(day.clock_out()),
                        day.day_total(),
                        day.week_total().unwrap_or_default()
                    );
                }
            }
            if let Some(path) = csv {
                tio::export_attendance_csv(path, &report)?;
            }
            Ok(false)
        }
        Commands::Access { cmd } => match cmd {
            AccessCmd::Show => {
                let matrix = &store.state().access_matrix;
                print!("{:<18}", "Sezione");
                for role in AdminLevel::ALL {
                    print!(" | {:<13}", role.label());
                }
                println!();
                for section in Section::ALL.into_iter().filter(|s| s.show_in_permissions()) {
                    print!("{:<18}", section.label());
                    for role in AdminLevel::ALL {
                        let mark = if access::can_access(role, section, matrix) { "sì" } else { "no" };
                        let lock = if section.always_allow() { "*" } else { "" };
                        print!(" | {:<13}", format!("{mark}{lock}"));
                    }
                    println!();
                }
                Ok(false)
            }
            AccessCmd::Set {
                section,
                role,
                allow,
            } => {
                let section =
                    Section::parse(&section).with_context(|| format!("unknown section: {section}"))?;
                store.set_access(session.level, section, AdminLevel::from(role), allow)?;
                Ok(true)
            }
        },
        Commands::Docs => {
            for doc in DOCUMENTS {
                println!("{} → {}", doc.label, doc.file);
            }
            Ok(false)
        }
        Commands::Profile => {
            let Some(username) = session.username.as_deref() else {
                println!("Nessun utente (documento vuoto)");
                return Ok(false);
            };
            let user = store
                .find_user(username)
                .with_context(|| format!("unknown user: {username}"))?;
            println!("{}", user.full_name());
            println!("username: {}", user.username);
            println!("livello: {}", user.admin_level.label());
            println!("posizione: {}", user.position.as_str());
            println!("contratto: {} ({}h)", user.contract_type, user.contract_hours);
            if !user.notes.is_empty() {
                println!("note: {}", user.notes);
            }
            Ok(false)
        }
        Commands::Export { out } => {
            tio::export_state_json(out, store.state())?;
            Ok(false)
        }
        Commands::Config { .. } => Ok(false),
    }
}

fn run_config(cmd: ConfigCmd, mut settings: Settings, explicit: Option<&Path>) -> Result<()> {
    let path = Settings::file_path(explicit)?;
    match cmd {
        ConfigCmd::Show => {
            println!("# {}", path.display());
            println!("{}", serde_json::to_string_pretty(&settings)?);
            println!("# state: {}", settings.resolved_state_path().display());
        }
        ConfigCmd::Set {
            state_path,
            visible_slots,
            show_summary,
            contract_hours,
        } => {
            if let Some(p) = state_path {
                settings.state_path = Some(p);
            }
            if let Some(n) = visible_slots {
                if n == 0 {
                    bail!("--visible-slots must be at least 1");
                }
                settings.visible_slots = n;
            }
            if let Some(show) = show_summary {
                settings.show_summary = show;
            }
            if let Some(hours) = contract_hours {
                if hours.is_nan() || hours <= 0.0 {
                    bail!("--contract-hours must be positive");
                }
                settings.default_contract_hours = hours;
            }
            settings.save(&path)?;
            println!("Salvato: {}", path.display());
        }
    }
    Ok(())
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() {
        "—"
    } else {
        s
    }
}

fn run_user(cmd: UserCmd, store: &mut Store, yes: bool) -> Result<bool> {
    match cmd {
        UserCmd::Add {
            username,
            nome,
            cognome,
            password,
            posizione,
            livello,
            ore,
            contratto,
            non_collaboratore,
            note,
        } => {
            let mut c = Collaborator::new(nome, cognome, username);
            c.password = password;
            c.position =
                Position::parse(&posizione).with_context(|| format!("invalid position: {posizione}"))?;
            c.admin_level = AdminLevel::from(livello);
            c.contract_hours = ore;
            c.contract_type = contratto;
            c.is_collaborator = !non_collaboratore;
            c.notes = note;
            store.add_user(c)?;
            Ok(true)
        }
        UserCmd::List => {
            for u in &store.state().users {
                println!(
                    "{} | {} | {} | {} | {}h{}",
                    u.username,
                    u.full_name(),
                    u.position.as_str(),
                    u.admin_level.label(),
                    u.contract_hours,
                    if u.is_collaborator { "" } else { " | fuori turno" }
                );
            }
            Ok(false)
        }
        UserCmd::Delete { username } => {
            if store.find_user(&username).is_none() {
                bail!("unknown user: {username}");
            }
            if !confirm(yes, "Sei sicuro di voler eliminare questo collaboratore?")? {
                println!("Annullato");
                return Ok(false);
            }
            store.delete_user(&username)?;
            Ok(true)
        }
        UserCmd::Import { csv } => {
            let users = tio::import_collaborators_csv(csv)?;
            let n = store.add_users(users)?;
            println!("{n} collaboratori importati");
            Ok(true)
        }
    }
}

fn run_preset(cmd: PresetCmd, store: &mut Store, yes: bool) -> Result<bool> {
    match cmd {
        PresetCmd::Add {
            name,
            in1,
            out1,
            in2,
            out2,
        } => {
            let id = store.add_preset(TimePreset {
                id: PresetId::random(),
                name,
                in1,
                out1,
                in2,
                out2,
            })?;
            println!("{id}");
            Ok(true)
        }
        PresetCmd::List => {
            for p in &store.state().time_presets {
                println!("{} | {}", p.id, p.label());
            }
            Ok(false)
        }
        PresetCmd::Delete { id } => {
            let id = PresetId::new(&id);
            if store.find_preset(&id).is_none() {
                bail!("unknown preset: {id}");
            }
            if !confirm(yes, "Eliminare questo preset?")? {
                println!("Annullato");
                return Ok(false);
            }
            store.delete_preset(&id)?;
            Ok(true)
        }
    }
}

fn run_template(cmd: TemplateCmd, store: &mut Store, settings: &Settings, yes: bool) -> Result<bool> {
    let mut editor = TemplateEditor::new(&store.state().templates, &store.state().users);
    match cmd {
        TemplateCmd::Create { name } => {
            let (template, warnings) = create_template(&name, &store.state().users, Utc::now())?;
            for w in warnings {
                eprintln!("attenzione: {} non ha username, riga `{}`", w.full_name, w.key);
            }
            println!("{}", template.id);
            store.add_template(template);
            Ok(true)
        }
        TemplateCmd::List => {
            for t in &store.state().templates {
                println!("{} | {} | {} righe", t.id, t.name, t.grid.len());
            }
            Ok(false)
        }
        TemplateCmd::Show {
            template,
            day,
            offset,
            html,
        } => {
            let id = TemplateId::new(&template);
            let draft = editor
                .draft(&id)
                .ok_or_else(|| EditorError::UnknownTemplate(id.clone()))?;
            let users = &store.state().users;
            let mut rows: Vec<RowInfo> = rows_for_roster(users);
            // lignes orphelines (collaborateur supprimé) en fin de grille
            for key in draft.grid.row_keys() {
                if !rows.iter().any(|r| r.key == key) {
                    rows.push(RowInfo::bare(key));
                }
            }
            let selection = select(day.as_deref(), settings)?;
            let out = render(
                &draft.grid,
                &rows,
                selection,
                None,
                offset,
                settings.visible_slots,
                html.as_deref(),
                &draft.name,
            )?;
            print!("{out}");

            if let Selection::Day(d) = selection {
                let presets = &store.state().time_presets;
                for row in &rows {
                    if let Some(p) = matching_preset(draft.grid.cell(&row.key, d), presets) {
                        println!("{} {}: preset {}", row.display_name, d.short_label(), p.label());
                    }
                }
            }
            println!();
            for c in users.iter().filter(|c| c.is_collaborator) {
                let mut c = c.clone();
                if c.contract_hours <= 0.0 {
                    c.contract_hours = settings.default_contract_hours;
                }
                let progress = editor.contract_progress(&id, &c);
                println!(
                    "{:<14} {:>8} / {}h {}",
                    c.short_name(),
                    format_hours_minutes(editor.weekly_minutes(&id, &row_key_for(&c).key)),
                    progress.contract_hours,
                    progress.bar(20)
                );
            }
            Ok(false)
        }
        TemplateCmd::Apply {
            template,
            row,
            day,
            preset,
        } => {
            let id = TemplateId::new(&template);
            let preset_id = PresetId::new(&preset);
            let preset = store
                .find_preset(&preset_id)
                .cloned()
                .ok_or(EditorError::UnknownPreset(preset_id))?;
            let updated = editor.apply_preset(&id, &row, parse_day(&day)?, &preset)?.clone();
            store.update_template(updated)?;
            if let Some((next_row, next_day)) = editor.focused_cell() {
                println!("prossima cella: {next_row} / {next_day}");
            }
            Ok(true)
        }
        TemplateCmd::Clear { template, row, day } => {
            let id = TemplateId::new(&template);
            let updated = editor.clear_cell(&id, &row, parse_day(&day)?)?.clone();
            store.update_template(updated)?;
            Ok(true)
        }
        TemplateCmd::Set {
            template,
            row,
            day,
            field,
            value,
        } => {
            let id = TemplateId::new(&template);
            let field = CellField::parse(&field).with_context(|| format!("invalid field: {field}"))?;
            let updated = editor
                .update_cell(&id, &row, parse_day(&day)?, field, &value)?
                .clone();
            store.update_template(updated)?;
            Ok(true)
        }
        TemplateCmd::Rename { template, name } => {
            let updated = editor.rename(&TemplateId::new(&template), &name)?.clone();
            store.update_template(updated)?;
            Ok(true)
        }
        TemplateCmd::Duplicate { template } => {
            let copy = editor.duplicate(&TemplateId::new(&template), Utc::now())?;
            println!("{} | {}", copy.id, copy.name);
            store.add_template(copy);
            Ok(true)
        }
        TemplateCmd::Delete { template } => {
            let id = TemplateId::new(&template);
            if store.find_template(&id).is_none() {
                bail!("unknown template: {id}");
            }
            if !confirm(yes, "Eliminare questo modello?")? {
                println!("Annullato");
                return Ok(false);
            }
            store.delete_template(&id)?;
            Ok(true)
        }
    }
}

fn run_clock(cmd: ClockCmd, store: &mut Store, session: &Session) -> Result<bool> {
    let username = session.username()?.to_string();
    match cmd {
        ClockCmd::Set {
            date,
            clock_in,
            clock_out,
        } => {
            let date = date.unwrap_or_else(today);
            let entry = store.save_time_entry(&username, date, &clock_in, &clock_out)?;
            println!(
                "{}: {} - {} ({})",
                timeclock::date_key(date),
                or_dash(&entry.clock_in),
                or_dash(&entry.clock_out),
                format_hours_minutes(timeclock::entry_minutes(&entry))
            );
            Ok(true)
        }
        ClockCmd::Show { month } => {
            let now = today();
            let state = store.state();
            let month = month.unwrap_or_else(|| timeclock::month_key(now));
            println!(
                "Mesi: {}",
                timeclock::user_months(&state.time_entries, &username, now).join(", ")
            );
            let proposal = timeclock::prefill(&state.time_entries, &state.generated_shifts, &username, now);
            println!(
                "Oggi {}: {} - {}",
                timeclock::date_key(now),
                or_dash(&proposal.clock_in),
                or_dash(&proposal.clock_out)
            );
            if let Some(days) = state.time_entries.get(&username).and_then(|m| m.get(&month)) {
                for (date, entry) in days {
                    println!(
                        "{date} | {:>5} | {:>5} | {}",
                        or_dash(&entry.clock_in),
                        or_dash(&entry.clock_out),
                        format_hours_minutes(timeclock::entry_minutes(entry))
                    );
                }
            }
            Ok(false)
        }
    }
}

fn select(day: Option<&str>, settings: &Settings) -> Result<Selection> {
    let mut selector = DaySelector::new(
        &DayKey::ALL,
        settings.show_summary,
        Some(timeclock::day_key_for(today())),
    )?;
    if let Some(raw) = day {
        let selection = Selection::parse(raw).with_context(|| format!("invalid day: {raw}"))?;
        selector.select(selection)?;
    }
    Ok(selector.current())
}

#[allow(clippy::too_many_arguments)]
fn render(
    grid: &Grid,
    rows: &[RowInfo],
    selection: Selection,
    start: Option<NaiveDate>,
    offset: usize,
    visible_slots: usize,
    html: Option<&Path>,
    title: &str,
) -> Result<String> {
    let slots = time_slots();
    let (text, fragment) = match selection {
        Selection::Day(day) => {
            let view = DayView::build(grid, rows, day, &slots, start);
            let mut viewport = Viewport::new(slots.len(), visible_slots);
            viewport.scroll_to(offset);
            (
                TextGrid.render_day(&view, &viewport),
                html.map(|_| HtmlGrid.render_day(&view, &Viewport::full(slots.len()))),
            )
        }
        Selection::Summary => {
            let view = SummaryView::build(grid, rows, &DayKey::ALL, start);
            (
                TextGrid.render_summary(&view),
                html.map(|_| HtmlGrid.render_summary(&view)),
            )
        }
    };
    match (html, fragment) {
        (Some(path), Some(body)) => {
            std::fs::write(path, page(title, &body))
                .with_context(|| format!("writing {}", path.display()))?;
            Ok(format!("{}\n", path.display()))
        }
        _ => Ok(text),
    }
}
