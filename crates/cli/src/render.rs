use std::io::Write;

use anyhow::Result;
use chrono::SecondsFormat;

use qscheduler_core::Priority;
use qscheduler_priority::{OrderedRequests, PrioritizedRequest};

/// The bands to print: every band, or only the requested one.
pub fn select_bands<'s, 'a>(
    ordered: &'s OrderedRequests<'a>,
    only: Option<Priority>,
) -> Vec<(Priority, &'s [PrioritizedRequest<'a>])> {
    match only {
        Some(priority) => vec![(priority, ordered.for_priority(priority))],
        None => ordered.bands().collect(),
    }
}

/// One header per band, then one indented line per request.
pub fn write_text(
    out: &mut impl Write,
    bands: &[(Priority, &[PrioritizedRequest<'_>])],
) -> Result<()> {
    for (priority, band) in bands {
        let noun = if band.len() == 1 { "request" } else { "requests" };
        writeln!(out, "{priority} ({} {noun})", band.len())?;
        for item in band.iter() {
            let request = item.request();
            writeln!(
                out,
                "  {}  account={}  enqueued={}",
                request.id,
                request.account_id,
                item.enqueued_at().to_rfc3339_opts(SecondsFormat::Secs, true)
            )?;
        }
    }
    Ok(())
}

/// Pretty-printed JSON: the whole ordering, or the selected band only.
pub fn write_json(
    out: &mut impl Write,
    ordered: &OrderedRequests<'_>,
    only: Option<Priority>,
) -> Result<()> {
    match only {
        Some(priority) => serde_json::to_writer_pretty(&mut *out, ordered.for_priority(priority))?,
        None => serde_json::to_writer_pretty(&mut *out, ordered)?,
    }
    writeln!(out)?;
    Ok(())
}
