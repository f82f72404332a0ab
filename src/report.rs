use crate::{
    attributes::{Intensity, Tissue},
    catalog::ExerciseRecord,
    filter::counts_by_direction,
};
use chrono::Local;
use maud::{DOCTYPE, Markup, html};
use std::path::Path;

trait FormatLabel {
    fn fmt_label(self) -> &'static str;
}

impl FormatLabel for Option<Intensity> {
    fn fmt_label(self) -> &'static str {
        self.map(Intensity::label).unwrap_or("-")
    }
}

impl FormatLabel for Option<Tissue> {
    fn fmt_label(self) -> &'static str {
        self.map(Tissue::label).unwrap_or("-")
    }
}

/// Write a printable HTML drill sheet for the given drills.
pub fn export_html_sheet<P: AsRef<Path>>(
    path: P,
    selection: Option<&str>,
    filters: &[String],
    drills: &[&ExerciseRecord],
) -> std::io::Result<()> {
    let generated = Local::now().format("%Y-%m-%d %H:%M").to_string();
    let markup = build_html(selection, filters, drills, &generated);
    std::fs::write(path, markup.into_string())
}

fn build_html(
    selection: Option<&str>,
    filters: &[String],
    drills: &[&ExerciseRecord],
    generated: &str,
) -> Markup {
    let counts = counts_by_direction(drills);
    html! {
        (DOCTYPE)
        html {
            head { meta charset="utf-8"; title { "Plyometric Drill Sheet" } }
            body {
                h1 { "Plyometric Drill Sheet" }
                p { "Generated " (generated) }
                table border="1" {
                    tr { th { "Selection" } td { (selection.unwrap_or("None")) } }
                    tr {
                        th { "Tag Filters" }
                        td {
                            @if filters.is_empty() { "None" } @else { (filters.join(", ")) }
                        }
                    }
                    tr {
                        th { "Drills" }
                        td {
                            (drills.len()) " ("
                            (counts.vertical) " vertical, "
                            (counts.lateral) " lateral, "
                            (counts.horizontal) " horizontal)"
                        }
                    }
                }
                h1 { "Drills" }
                @if drills.is_empty() {
                    p { "No matching drills" }
                } @else {
                    table border="1" {
                        tr {
                            th { "Name" } th { "Contact" } th { "Direction" } th { "Structure" }
                            th { "Load" } th { "Intensity" } th { "Tissue" } th { "Notes" }
                        }
                        @for d in drills {
                            tr {
                                td { (d.name) }
                                td { (d.contact.label()) }
                                td { (d.direction.label()) }
                                td { (d.structure.label()) }
                                td { (d.load.label()) }
                                td { (d.intensity.fmt_label()) }
                                td { (d.tissue.fmt_label()) }
                                td { (d.notes) }
                            }
                        }
                    }
                }
            }
        }
    }
}
