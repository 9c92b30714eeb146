use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use console::style;
use tessera_picker::{MonthGrid, TimeTable};
use tessera_picker_widget::{GridView, PickerView};

pub fn status(label: &str, message: impl AsRef<str>) {
    println!("{:>12} {}", style(label).green().bold(), message.as_ref());
}

pub fn warn(message: impl AsRef<str>) {
    eprintln!("{}: {}", style("warning").yellow().bold(), message.as_ref());
}

pub fn print_view(view: &PickerView) {
    let table = match &view.grid {
        GridView::Days(grid) => month_table(grid),
        GridView::Hours(table) | GridView::Minutes(table) => time_table(table),
    };
    println!("{table}");
    println!("{:>12} [{}]", "", view.now_button_text);
}

fn month_table(grid: &MonthGrid) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            grid.weekdays
                .iter()
                .map(|day| Cell::new(day).add_attribute(Attribute::Bold)),
        );
    println!(
        "{} {} {}",
        grid.prev.text,
        style(&grid.title).bold(),
        grid.next.text
    );
    for week in &grid.weeks {
        table.add_row(week.iter().map(|cell| {
            let mut rendered = Cell::new(&cell.text);
            if cell.out_of_month {
                rendered = rendered.fg(Color::DarkGrey);
            }
            if cell.in_selected_interval {
                rendered = rendered.fg(Color::Cyan);
            }
            if cell.is_today {
                rendered = rendered.add_attribute(Attribute::Underlined);
            }
            rendered
        }));
    }
    table
}

fn time_table(times: &TimeTable) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    println!("{}", style(&times.title).bold());
    for row in &times.rows {
        table.add_row(row.iter().map(|cell| {
            let rendered = Cell::new(&cell.text);
            if cell.is_now {
                rendered.add_attribute(Attribute::Underlined)
            } else {
                rendered
            }
        }));
    }
    table
}
