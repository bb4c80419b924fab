//! `today` and `date`: print one day's lessons.

use chrono::{Local, NaiveDate};

use nextlesson_providers::Timetable;

use crate::error::CliResult;
use crate::render;

pub async fn today(service: &Timetable, name: &str, json: bool) -> CliResult<()> {
    let today = Local::now().date_naive();
    let element = service.resolve(name, today).await?;
    let lessons = service.today(&element, today).await;
    print_lessons(&lessons, json)
}

pub async fn for_date(
    service: &Timetable,
    name: &str,
    date: NaiveDate,
    json: bool,
) -> CliResult<()> {
    let today = Local::now().date_naive();
    let element = service.resolve(name, today).await?;
    let lessons = service.for_date(&element, date).await;
    print_lessons(&lessons, json)
}

fn print_lessons(lessons: &[nextlesson_core::Lesson], json: bool) -> CliResult<()> {
    if json {
        println!("{}", render::lessons_json(lessons)?);
    } else {
        println!("{}", render::render_lessons(lessons));
    }
    Ok(())
}
