//! Markdown Renderer: `GenerationResult` → a single Markdown document.
//!
//! Pure and deterministic; used for the UI preview and the `.md` download.

use std::fmt::Write;

use crate::models::result::GenerationResult;

const NAME_PLACEHOLDER: &str = "Candidate Name";
const PROJECT_PLACEHOLDER: &str = "Untitled Project";

pub fn render_markdown(result: &GenerationResult) -> String {
    let mut out = String::new();

    let name = if result.name.trim().is_empty() {
        NAME_PLACEHOLDER
    } else {
        result.name.trim()
    };
    push_line(&mut out, &format!("# {name}"));

    let contact = contact_line(result);
    if !contact.is_empty() {
        out.push('\n');
        push_line(&mut out, &contact);
    }

    section(&mut out, "Summary");
    if !result.summary.trim().is_empty() {
        push_line(&mut out, result.summary.trim());
    }

    section(&mut out, "Skills");
    for skill in &result.skills {
        if skill.description.is_empty() {
            push_line(&mut out, &format!("- **{}**", skill.skill));
        } else {
            push_line(&mut out, &format!("- **{}**: {}", skill.skill, skill.description));
        }
    }

    if !result.experience.is_empty() {
        section(&mut out, "Experience");
        for (i, job) in result.experience.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let heading = [job.role.as_str(), job.company.as_str()]
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", ");
            if !heading.is_empty() {
                push_line(&mut out, &format!("### {heading}"));
            }
            if !job.dates.is_empty() {
                push_line(&mut out, &format!("_{}_", job.dates));
            }
            bullets(&mut out, &job.bullets);
        }
    }

    section(&mut out, "Projects");
    for (i, project) in result.projects.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let name = match project.name.trim() {
            "" => PROJECT_PLACEHOLDER,
            name => name,
        };
        push_line(&mut out, &format!("### {name}"));
        if !project.short_desc.is_empty() {
            push_line(&mut out, &project.short_desc);
        }
        if !project.tech.is_empty() {
            push_line(&mut out, &format!("_Tech: {}_", project.tech.join(", ")));
        }
        bullets(&mut out, &project.bullets);
    }

    if !result.education.is_empty() {
        section(&mut out, "Education");
        for edu in &result.education {
            let mut line = [edu.degree.as_str(), edu.school.as_str()]
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", ");
            if !edu.year.is_empty() {
                let _ = write!(line, " ({})", edu.year);
            }
            push_line(&mut out, &format!("- {}", line.trim()));
        }
    }

    out
}

fn contact_line(result: &GenerationResult) -> String {
    if result.contact.is_empty() {
        return String::new();
    }
    let mut parts = Vec::new();
    if !result.contact.email.is_empty() {
        parts.push(format!("Email: {}", result.contact.email));
    }
    if !result.contact.location.is_empty() {
        parts.push(result.contact.location.clone());
    }
    parts.join(" | ")
}

fn section(out: &mut String, title: &str) {
    out.push('\n');
    push_line(out, &format!("## {title}"));
}

fn bullets(out: &mut String, items: &[String]) {
    for item in items.iter().filter(|b| !b.trim().is_empty()) {
        push_line(out, &format!("- {}", item.trim()));
    }
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}
