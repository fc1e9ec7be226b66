// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use tfsync_core::{GetRequest, ItemSpec, ProcessReport, VersionSpec};

use crate::error::Result;
use crate::project::{cancel_on_ctrl_c, scope_specs};

use super::{finish_process, open_workspace};

pub fn run(paths: Vec<String>, version: String, force: bool, no_get: bool) -> Result<()> {
    let version: VersionSpec = version.parse()?;
    let (project, workspace) = open_workspace()?;
    let requests = requests(scope_specs(&project.mapper()?, &paths)?, version);

    let report = workspace.get(&requests, force, no_get, &cancel_on_ctrl_c())?;
    println!("{}", summary(&report, no_get));
    finish_process(&report)
}

pub(crate) fn requests(specs: Vec<ItemSpec>, version: VersionSpec) -> Vec<GetRequest> {
    specs
        .into_iter()
        .map(|spec| GetRequest::new(spec, version))
        .collect()
}

pub(crate) fn summary(report: &ProcessReport, no_get: bool) -> String {
    if report.applied == 0 && report.failures.is_empty() {
        return "All files are up to date".to_string();
    }
    let verb = if no_get { "Recorded" } else { "Updated" };
    format!(
        "{} {} item(s), {} version(s) written back",
        verb, report.applied, report.flushed
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tfsync_core::LocalFailure;

    #[test]
    fn every_spec_gets_the_version() {
        let requests = requests(
            vec![ItemSpec::full("$/A"), ItemSpec::full("$/B")],
            VersionSpec::Changeset(12),
        );
        assert_eq!(requests.len(), 2);
        assert!(requests
            .iter()
            .all(|r| r.version == VersionSpec::Changeset(12)));
        assert_eq!(requests[1].item.path, "$/B");
    }

    #[test]
    fn nothing_applied_is_up_to_date() {
        assert_eq!(
            summary(&ProcessReport::default(), false),
            "All files are up to date"
        );
    }

    #[test]
    fn summary_counts_items() {
        let report = ProcessReport {
            applied: 4,
            flushed: 4,
            ..ProcessReport::default()
        };
        assert_eq!(
            summary(&report, false),
            "Updated 4 item(s), 4 version(s) written back"
        );
        assert!(summary(&report, true).starts_with("Recorded"));
    }

    #[test]
    fn failures_are_not_up_to_date() {
        let report = ProcessReport {
            failures: vec![LocalFailure {
                item_id: 1,
                path: None,
                message: "denied".into(),
            }],
            ..ProcessReport::default()
        };
        assert!(summary(&report, false).starts_with("Updated 0"));
    }
}
