//! `resolve`: show what a name maps to.

use chrono::Local;

use nextlesson_providers::Timetable;

use crate::error::CliResult;
use crate::render;

pub async fn run(service: &Timetable, name: &str, json: bool) -> CliResult<()> {
    let today = Local::now().date_naive();
    let element = service.resolve(name, today).await?;

    if json {
        println!("{}", render::element_json(&element)?);
    } else {
        let url = service.week_view_url(&element, today);
        println!("{}", render::render_element(&element, &url));
    }
    Ok(())
}
