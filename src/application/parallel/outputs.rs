//! Output assignment for a batch
//!
//! Two tasks must never write the same PDF. Tasks whose destinations collide
//! are renamed `<template stem>-<config stem>`; a task that still collides
//! with an earlier one fails with [`BuildError::OutputConflict`] instead of
//! being dispatched.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::debug;

use crate::domain::entities::CompilationTask;
use crate::domain::ports::{BuildPipeline, BuildRequest};
use crate::error::BuildError;

/// One request per task, in the order given. Earlier tasks keep their claim.
pub(super) fn plan_requests(
    pipeline: &dyn BuildPipeline,
    tasks: &[&CompilationTask],
) -> Vec<Result<BuildRequest, BuildError>> {
    let requests: Vec<BuildRequest> = tasks.iter().map(|task| BuildRequest::from(*task)).collect();

    let mut claims: HashMap<PathBuf, usize> = HashMap::new();
    for output in requests.iter().filter_map(|r| pipeline.output_path(r)) {
        *claims.entry(output).or_default() += 1;
    }

    let mut owners: HashMap<PathBuf, PathBuf> = HashMap::new();
    requests
        .into_iter()
        .map(|request| {
            let Some(output) = pipeline.output_path(&request) else {
                return Ok(request);
            };

            let request = match (claims.get(&output), request.qualified_name()) {
                (Some(&count), Some(name)) if count > 1 => {
                    debug!(template = %request.template_file.display(), name = %name, "renaming shared output");
                    request.with_output_name(name)
                }
                _ => request,
            };
            let output = pipeline.output_path(&request).unwrap_or(output);

            match owners.get(&output) {
                Some(owner) => Err(BuildError::OutputConflict {
                    output,
                    owner: owner.clone(),
                }),
                None => {
                    owners.insert(output, request.template_file.clone());
                    Ok(request)
                }
            }
        })
        .collect()
}
