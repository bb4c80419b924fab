//! `list`: every class and teacher the deployment admits to.

use chrono::Local;

use nextlesson_providers::Timetable;

use crate::error::CliResult;
use crate::render;

pub async fn run(service: &Timetable, json: bool) -> CliResult<()> {
    let today = Local::now().date_naive();
    let directory = service.list_elements(today).await;

    if json {
        let value = serde_json::json!({
            "classes": directory.classes,
            "teachers": directory.teachers,
            "classes_available": directory.classes_available,
            "teachers_available": directory.teachers_available,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print!("{}", render::render_directory(&directory));
    }
    Ok(())
}
