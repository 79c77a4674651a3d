use ferrous_lookup_domain::validators::validate_domain_name;
use ferrous_lookup_domain::{DnsQuery, LookupFailure, LookupResult, RecordType};
use futures::future::join_all;
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::di::UseCases;
use crate::output::{render_inspection, render_lookup, LookupReport};

/// Runs every lookup concurrently and prints the results in argument order.
pub async fn lookup(
    use_cases: &UseCases,
    domains: &[String],
    record_type: RecordType,
    json: bool,
) -> anyhow::Result<()> {
    let results = join_all(domains.iter().map(|domain| {
        let lookup = Arc::clone(&use_cases.lookup);
        async move {
            if let Err(reason) = validate_domain_name(domain) {
                debug!(domain = %domain, reason = %reason, "Rejected domain");
                return LookupResult::error(LookupFailure::new(reason), 0.0);
            }
            lookup
                .execute(&DnsQuery::new(domain.as_str(), record_type))
                .await
        }
    }))
    .await;

    let reports: Vec<LookupReport<'_>> = domains
        .iter()
        .zip(&results)
        .map(|(domain, result)| LookupReport {
            domain,
            record_type,
            result,
        })
        .collect();

    let mut stdout = std::io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut stdout, &reports)?;
        writeln!(stdout)?;
    } else {
        for report in &reports {
            write!(stdout, "{}", render_lookup(report))?;
        }
    }

    Ok(())
}

pub async fn inspect(use_cases: &UseCases, domain: &str, json: bool) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();

    let entries = match use_cases.inspect.execute(domain).await {
        Ok(entries) => entries,
        Err(e) => {
            warn!(error = %e, "Cache inspection failed");
            writeln!(stdout, "error: {}", e)?;
            return Ok(());
        }
    };

    if json {
        serde_json::to_writer_pretty(&mut stdout, &entries)?;
        writeln!(stdout)?;
    } else {
        write!(stdout, "{}", render_inspection(domain, &entries))?;
    }

    Ok(())
}
