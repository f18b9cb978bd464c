use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::cli::output::{format_draft, format_missing, format_step_header};
use crate::io::recovery::log_failed_submission;
use crate::io::repository::ItemRepository;
use crate::model::draft::{DraftField, MAX_IMAGES};
use crate::model::item::{Condition, Item, is_listable_category};
use crate::model::locale::Language;
use crate::ops::listing_workflow::{ListingWorkflow, SubmitOutcome, Transition};

const HELP: &str = "\
commands:
  set <field> <value>   title, description, price, condition, category, location, quantity
  tag add <tag>         add a tag (duplicates are ignored)
  tag rm <tag>          remove a tag
  image add <ref>...    attach images (at most 10)
  image rm <n>          remove the n-th image
  qty + | qty - | qty <n>
  next | prev           move between steps
  status                show the current step and the draft
  submit                publish the listing (Review step only)
  quit                  abandon the draft";

/// How a sell session ended
#[derive(Debug, Clone, PartialEq)]
pub enum SellOutcome {
    Submitted(Item),
    Abandoned,
}

/// Drive a listing workflow from line commands until it is submitted or
/// abandoned. End of input abandons the draft. Failed submissions are kept
/// in the recovery log under `recovery_dir`.
pub fn run_sell<R, W, Repo>(
    input: R,
    out: &mut W,
    repo: &mut Repo,
    lang: Language,
    recovery_dir: &Path,
) -> io::Result<SellOutcome>
where
    R: BufRead,
    W: Write,
    Repo: ItemRepository + ?Sized,
{
    let mut wf = ListingWorkflow::new();
    if let Some(step) = wf.step() {
        writeln!(out, "{}", format_step_header(step, lang))?;
    }

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (cmd, rest) = match line.split_once(char::is_whitespace) {
            Some((c, r)) => (c, r.trim()),
            None => (line, ""),
        };

        match cmd {
            "set" => set_field(&mut wf, rest, out)?,
            "tag" => edit_tags(&mut wf, rest, out)?,
            "image" => edit_images(&mut wf, rest, out)?,
            "qty" => edit_quantity(&mut wf, rest, out)?,
            "next" => match wf.next() {
                Transition::Moved(step) => writeln!(out, "{}", format_step_header(step, lang))?,
                Transition::Gated { missing, .. } => {
                    writeln!(out, "complete first: {}", format_missing(&missing))?
                }
                Transition::Ignored => writeln!(out, "already at the last step; use `submit`")?,
            },
            "prev" => match wf.previous() {
                Transition::Moved(step) => writeln!(out, "{}", format_step_header(step, lang))?,
                _ => writeln!(out, "already at the first step")?,
            },
            "status" => {
                if let Some(step) = wf.step() {
                    writeln!(out, "{}", format_step_header(step, lang))?;
                }
                for l in format_draft(wf.draft(), lang) {
                    writeln!(out, "  {}", l)?;
                }
            }
            "submit" => match wf.submit(&mut *repo) {
                Ok(SubmitOutcome::Submitted(item)) => {
                    writeln!(out, "listed as [{}] {}", item.id, item.title)?;
                    return Ok(SellOutcome::Submitted(item));
                }
                Ok(SubmitOutcome::Gated(missing)) => {
                    writeln!(out, "cannot submit, missing: {}", format_missing(&missing))?
                }
                Ok(SubmitOutcome::Ignored) => {
                    writeln!(out, "submit is only available at the Review step")?
                }
                Err(e) => {
                    if let Some(payload) = wf.draft().freeze() {
                        log_failed_submission(recovery_dir, &payload, &e.to_string());
                    }
                    writeln!(out, "submit failed: {}", e)?;
                    writeln!(out, "the draft was kept; fix it or try `submit` again")?;
                }
            },
            "help" => writeln!(out, "{}", HELP)?,
            "quit" | "exit" => break,
            other => writeln!(out, "unknown command: {} (try `help`)", other)?,
        }
    }

    wf.abandon();
    writeln!(out, "draft abandoned")?;
    Ok(SellOutcome::Abandoned)
}

fn set_field<W: Write>(wf: &mut ListingWorkflow, rest: &str, out: &mut W) -> io::Result<()> {
    let (name, value) = match rest.split_once(char::is_whitespace) {
        Some((n, v)) => (n, v.trim()),
        None => (rest, ""),
    };
    let Some(field) = DraftField::parse(name) else {
        return writeln!(out, "unknown field: {}", name);
    };
    let Some(draft) = wf.draft_mut() else {
        return Ok(());
    };
    match field {
        DraftField::Title => draft.title = value.to_string(),
        DraftField::Description => draft.description = value.to_string(),
        DraftField::Price => {
            draft.price = value.to_string();
            if !value.is_empty() && draft.price_value().is_none() {
                writeln!(out, "note: price must be a positive number")?;
            }
        }
        DraftField::Condition => match Condition::parse(value) {
            Some(c) => draft.condition = Some(c),
            None => {
                return writeln!(
                    out,
                    "unknown condition \"{}\" (expected: new, like_new, good, fair)",
                    value
                );
            }
        },
        DraftField::Category => {
            if !is_listable_category(value) {
                return writeln!(out, "unknown category \"{}\" (see `mkt categories`)", value);
            }
            draft.category = value.to_string();
        }
        DraftField::Location => draft.location = value.to_string(),
        DraftField::Quantity => return edit_quantity(wf, value, out),
        DraftField::Images | DraftField::Tags => {
            return writeln!(out, "use `image add` or `tag add` for {}", field.as_str());
        }
    }
    writeln!(out, "{} set", field.as_str())
}

fn edit_tags<W: Write>(wf: &mut ListingWorkflow, rest: &str, out: &mut W) -> io::Result<()> {
    let Some(draft) = wf.draft_mut() else {
        return Ok(());
    };
    match rest.split_once(char::is_whitespace) {
        Some(("add", tag)) => {
            if draft.add_tag(tag) {
                writeln!(out, "tags: {}", draft.tag_count())
            } else {
                writeln!(out, "tag ignored (empty or already present)")
            }
        }
        Some(("rm", tag)) => {
            if draft.remove_tag(tag) {
                writeln!(out, "tags: {}", draft.tag_count())
            } else {
                writeln!(out, "no such tag: {}", tag.trim())
            }
        }
        _ => writeln!(out, "usage: tag add|rm <tag>"),
    }
}

fn edit_images<W: Write>(wf: &mut ListingWorkflow, rest: &str, out: &mut W) -> io::Result<()> {
    let Some(draft) = wf.draft_mut() else {
        return Ok(());
    };
    match rest.split_once(char::is_whitespace) {
        Some(("add", refs)) => {
            let wanted: Vec<&str> = refs.split_whitespace().collect();
            let added = draft.add_images(wanted.iter().copied());
            if added < wanted.len() {
                writeln!(out, "image limit reached ({} max)", MAX_IMAGES)?;
            }
            writeln!(out, "images: {}", draft.images().len())
        }
        Some(("rm", n)) => {
            let removed = n
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|idx| draft.remove_image(idx));
            match removed {
                Some(r) => writeln!(out, "removed {}", r),
                None => writeln!(out, "no image number {}", n.trim()),
            }
        }
        _ => writeln!(out, "usage: image add <ref>... | image rm <n>"),
    }
}

fn edit_quantity<W: Write>(wf: &mut ListingWorkflow, rest: &str, out: &mut W) -> io::Result<()> {
    let Some(draft) = wf.draft_mut() else {
        return Ok(());
    };
    match rest {
        "+" => draft.increment_quantity(),
        "-" => draft.decrement_quantity(),
        n => match n.parse::<u32>() {
            Ok(q) if q >= 1 => draft.quantity = q,
            _ => return writeln!(out, "quantity must be a whole number of at least 1"),
        },
    }
    writeln!(out, "quantity: {}", draft.quantity)
}
