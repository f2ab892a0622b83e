//! Eligibility search for share placement.
//!
//! An instance may host a new share iff it matches the placement template,
//! reports `READY`, has no running op against it or its shares, and still
//! has a free share slot. Instances which match but are mid-create,
//! mid-repair or busy are reported back so that the caller can tell the CSI
//! loop to retry rather than over-provision a fresh instance.

use crate::{
    cloud::CloudFileApi,
    config::OpsManagerConfig,
    context::CreateParams,
    controller::registry,
    errors::SvcError,
};
use ipnetwork::Ipv4Network;
use share_port::{
    constants::{match_label_keys, MAX_SHARES_PER_INSTANCE},
    types::v0::transport::{InstanceState, ListFilter, MultishareInstance, OperationInfo},
};
use std::net::Ipv4Addr;

/// Why a matched instance cannot take a share right now.
enum Busy {
    /// The instance state forbids share ops.
    State(InstanceState),
    /// A running op holds the instance.
    Op(OperationInfo),
}

/// Return the matched instances which can host a new share right now.
///
/// Errors with [`SvcError::InstancesBusy`] when every matched instance is
/// merely busy, so the caller retries instead of creating a new instance.
pub(crate) async fn instance_candidates(
    cloud: &dyn CloudFileApi,
    config: &OpsManagerConfig,
    params: &CreateParams,
    template: &MultishareInstance,
    regions: &[String],
    ops: &[OperationInfo],
) -> Result<Vec<MultishareInstance>, SvcError> {
    let matched = matched_instances(cloud, config, params, template, regions).await?;

    let mut ready = Vec::new();
    let mut busy = Vec::new();
    for instance in matched {
        tracing::info!(
            instance = %instance,
            state = %instance.state,
            max_share_count = instance.max_share_count,
            "Found matching multishare instance"
        );
        match &instance.state {
            InstanceState::Creating | InstanceState::Repairing => {
                let state = instance.state.clone();
                busy.push((instance, Busy::State(state)));
            }
            InstanceState::Ready => {
                if let Some(op) = registry::instance_or_child_op(&instance, ops) {
                    let op = op.clone();
                    busy.push((instance, Busy::Op(op)));
                    continue;
                }
                let shares = cloud.list_shares(&ListFilter::instance(&instance)).await?;
                if shares.len() >= effective_max_share_count(config, &instance) {
                    tracing::info!(instance = %instance, shares = shares.len(), "Instance is full");
                    continue;
                }
                ready.push(instance);
            }
            InstanceState::Other(state) => {
                tracing::info!(instance = %instance, %state, "Instance state is not eligible");
            }
        }
    }

    if ready.is_empty() && !busy.is_empty() {
        return Err(SvcError::InstancesBusy {
            summary: busy_summary(&busy),
        });
    }
    Ok(ready)
}

/// One line per busy instance, naming its blocking op or state.
fn busy_summary(busy: &[(MultishareInstance, Busy)]) -> String {
    busy.iter()
        .map(|(instance, reason)| match reason {
            Busy::Op(op) => {
                format!("Instance {} busy with operation type {}", instance.name, op.kind)
            }
            Busy::State(state) => format!("Instance {} is in state {}", instance.name, state),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// List instances of every allowed region and keep those matching the
/// placement template.
async fn matched_instances(
    cloud: &dyn CloudFileApi,
    config: &OpsManagerConfig,
    params: &CreateParams,
    template: &MultishareInstance,
    regions: &[String],
) -> Result<Vec<MultishareInstance>, SvcError> {
    let mut instances = Vec::new();
    for region in regions {
        instances.extend(
            cloud
                .list_instances(&ListFilter::location(config.project(), region))
                .await?,
        );
    }

    let mut matched = Vec::new();
    for candidate in instances {
        if matches_template(&candidate, template, params.reserved_ipv4_cidr())? {
            matched.push(candidate);
        }
    }
    Ok(matched)
}

/// The share cap enforced for an instance.
///
/// With the configurable share limit feature off, the driver keeps placing at
/// most the fixed fallback per instance, whatever the instance reports.
fn effective_max_share_count(config: &OpsManagerConfig, instance: &MultishareInstance) -> usize {
    if config.configurable_max_shares() {
        instance.max_share_count
    } else {
        MAX_SHARES_PER_INSTANCE
    }
}

/// Whether a discovered instance can host a share cut to the template.
///
/// The match labels must all be present on the template; a template without
/// them is a provisioning error, not a non-match.
pub(crate) fn matches_template(
    candidate: &MultishareInstance,
    template: &MultishareInstance,
    reserved_cidr: Option<Ipv4Network>,
) -> Result<bool, SvcError> {
    for label in match_label_keys() {
        let Some(wanted) = template.labels.get(label) else {
            return Err(SvcError::MissingMatchLabel {
                label: label.to_string(),
                instance: template.to_string(),
            });
        };
        if candidate.labels.get(label) != Some(wanted) {
            return Ok(false);
        }
    }

    if let Some(cidr) = reserved_cidr {
        let ip = candidate.network.ip.parse::<Ipv4Addr>().map_err(|_| {
            SvcError::InvalidInstanceIp {
                instance: candidate.to_string(),
                ip: candidate.network.ip.clone(),
            }
        })?;
        if !cidr.contains(ip) {
            return Ok(false);
        }
    }

    if candidate.protocol != template.protocol {
        return Ok(false);
    }

    Ok(candidate.location.eq_ignore_ascii_case(&template.location)
        && candidate.tier.eq_ignore_ascii_case(&template.tier)
        && candidate.network.name.eq_ignore_ascii_case(&template.network.name)
        && candidate.network.connect_mode == template.network.connect_mode
        && candidate.kms_key_name.eq_ignore_ascii_case(&template.kms_key_name))
}
