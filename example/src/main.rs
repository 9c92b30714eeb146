//! Replays a gesture script against a headless picker and prints what the
//! host element would show.
//!
//! ```text
//! example --mode minute --zone Europe/Paris \
//!     open day:15 hour:23 show minute:10
//! ```

use anyhow::{Context, Result, bail};
use chrono::{DateTime, FixedOffset, Utc};
use clap::Parser;
use tessera_picker::{ClickTarget, Granularity, LocalZone, MinuteStep};
use tessera_picker_widget::{DateTimePicker, Document, GridView, MemoryHost, PickerConfig};

mod gesture;
mod render;

use gesture::{DayRef, Gesture};

#[derive(Parser)]
#[command(name = "example")]
#[command(version, about = "Drive a tessera date/time picker from the command line", long_about = None)]
struct Cli {
    /// Granularity: day, hour, minute or day-interval
    #[arg(short, long, default_value = "minute")]
    mode: Granularity,
    /// strftime output format (empty for ISO-8601 with offset)
    #[arg(short, long, default_value = "")]
    format: String,
    /// Separator between the two sides of an interval
    #[arg(long, default_value = " - ")]
    separator: String,
    /// Locale for grid headers
    #[arg(short, long, default_value = "en_US")]
    locale: String,
    /// Start in fixed UTC mode
    #[arg(long)]
    utc: bool,
    /// Local zone: an IANA name, a fixed offset such as +01:00, or "system"
    #[arg(short, long, default_value = "system")]
    zone: String,
    /// Minute grid step (5 or 10)
    #[arg(long, default_value_t = 10)]
    step: u32,
    /// Do not pad committed values to the granularity boundary
    #[arg(long)]
    no_pad: bool,
    /// Do not commit pending edits when the dropdown closes
    #[arg(long)]
    no_update_on_close: bool,
    /// Label of the "now" button
    #[arg(long, default_value = "Now")]
    now_text: String,
    /// Initial field text
    #[arg(short, long)]
    initial: Option<String>,
    /// Pin "now" to an RFC 3339 instant
    #[arg(long)]
    now: Option<DateTime<Utc>>,
    /// Gestures to replay, e.g. `open day:15 hour:2 type:2012-03-03 change`
    gestures: Vec<Gesture>,
}

fn init_tracing() {
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match tracing_subscriber::EnvFilter::try_new(
            "error,tessera_picker=info,tessera_picker_widget=info",
        ) {
            Ok(filter) => filter,
            Err(_) => tracing_subscriber::EnvFilter::new("error"),
        },
    };

    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .try_init();
}

fn parse_zone(zone: &str) -> Result<LocalZone> {
    if zone.eq_ignore_ascii_case("system") {
        return Ok(LocalZone::detect());
    }
    if zone.starts_with(['+', '-']) {
        let offset: FixedOffset = zone
            .parse()
            .with_context(|| format!("`{zone}` is not a UTC offset"))?;
        return Ok(LocalZone::Fixed(offset));
    }
    Ok(LocalZone::named(zone)?)
}

fn build_config(cli: &Cli) -> Result<PickerConfig> {
    let mut config = PickerConfig::default()
        .granularity(cli.mode)
        .format(cli.format.as_str())
        .interval_separator(cli.separator.as_str())
        .locale(cli.locale.as_str())
        .utc_mode(cli.utc)
        .pad_to_boundary(!cli.no_pad)
        .update_on_close(!cli.no_update_on_close)
        .now_button_text(cli.now_text.as_str())
        .minute_step(MinuteStep::try_from(cli.step)?)
        .zone(parse_zone(&cli.zone)?)
        .callback(|event| match serde_json::to_string(event) {
            Ok(json) => render::status("change", json),
            Err(err) => render::warn(format!("unable to encode change event: {err}")),
        });
    if let Some(initial) = &cli.initial {
        config = config.initial_value(initial.as_str());
    }
    config.validate()?;
    Ok(config)
}

fn day_target(picker: &DateTimePicker, day: DayRef) -> Result<ClickTarget> {
    match day {
        DayRef::Date(date) => Ok(ClickTarget::Day(date)),
        DayRef::OfDisplayedMonth(number) => {
            let GridView::Days(grid) = picker.view().grid else {
                bail!("the month grid is not displayed");
            };
            grid.day(number)
                .map(|cell| cell.target())
                .with_context(|| format!("{} has no day {number}", grid.title))
        }
    }
}

fn replay(picker: &DateTimePicker, host: &MemoryHost, gesture: &Gesture) -> Result<()> {
    match gesture {
        Gesture::Open => picker.open(),
        Gesture::Outside => picker.document().dispatch_click(None),
        Gesture::Day(day) => picker.click(day_target(picker, *day)?),
        Gesture::Hover(day) => match day_target(picker, *day)? {
            ClickTarget::Day(date) => picker.hover(Some(date)),
            _ => picker.hover(None),
        },
        Gesture::Hour(hour) => picker.click(ClickTarget::Hour(*hour)),
        Gesture::Minute(minute) => picker.click(ClickTarget::Minute(*minute)),
        Gesture::Prev => picker.click(ClickTarget::PrevMonth),
        Gesture::Next => picker.click(ClickTarget::NextMonth),
        Gesture::Now => picker.click(ClickTarget::Now),
        Gesture::Type(text) => host.type_text(text),
        Gesture::Change => picker.field_changed(),
        Gesture::ToggleTz => picker.toggle_timezone(),
        Gesture::Show => render::print_view(&picker.view()),
    }
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = build_config(&cli)?;

    let host = MemoryHost::with_timezone_toggle();
    let document = Document::new();
    let pinned = cli.now;
    let picker = DateTimePicker::init_with(
        document,
        move || pinned.unwrap_or_else(Utc::now),
        "example",
        host.clone(),
        config,
    )?;
    tracing::info!(mode = %cli.mode, zone = %cli.zone, gestures = cli.gestures.len(), "picker attached");
    render::status("attached", format!("mode {} zone {}", cli.mode, cli.zone));

    for gesture in &cli.gestures {
        replay(&picker, &host, gesture).with_context(|| format!("gesture `{gesture}` failed"))?;
        let label = host.timezone_label().unwrap_or_default();
        render::status(
            &gesture.to_string(),
            format!("field {:?} [{label}]", host.text()),
        );
        if let Some(error) = picker.last_error() {
            render::warn(error.to_string());
        }
    }

    if picker.is_displayed() {
        if let Some(view) = host.last_view() {
            render::print_view(&view);
        }
    }
    Ok(())
}
