//! Mapping of accessibility requirements onto cloud regions.

use crate::errors::SvcError;
use share_port::types::v0::transport::TopologyRequirement;

/// The region of a zone named `<geo>-<area>-<zone>`.
pub(crate) fn region_from_zone(zone: &str) -> Result<String, SvcError> {
    match zone.split('-').collect::<Vec<_>>().as_slice() {
        [geo, area, z] if !geo.is_empty() && !area.is_empty() && !z.is_empty() => {
            Ok(format!("{geo}-{area}"))
        }
        _ => Err(SvcError::InvalidZone {
            zone: zone.to_string(),
        }),
    }
}

/// The regions a new share may be placed into.
///
/// Every zone of the requirement maps to its region, deduplicated in
/// first-seen order. Without a requirement, and when the requirement yields
/// nothing, placement falls back to the driver's own region.
pub(crate) fn allowed_regions(
    topology: Option<&TopologyRequirement>,
    driver_zone: &str,
) -> Result<Vec<String>, SvcError> {
    let driver_region = region_from_zone(driver_zone)?;
    let Some(topology) = topology else {
        return Ok(vec![driver_region]);
    };

    let mut regions: Vec<String> = Vec::new();
    for zone in &topology.zones {
        let region = region_from_zone(zone)?;
        if !regions.contains(&region) {
            regions.push(region);
        }
    }

    if regions.is_empty() {
        regions.push(driver_region);
    }
    Ok(regions)
}
