use crate::errors::SvcError;
use ipnetwork::Ipv4Network;
use std::collections::HashMap;
use strum_macros::{AsRefStr, Display, EnumString};

/// The storage-class parameter keys the manager reads off a create request.
///
/// Everything else in the parameter map is passed through untouched.
#[derive(AsRefStr, EnumString, Display)]
pub enum Parameters {
    /// CIDR hint to allocate new instance addresses from.
    #[strum(serialize = "reserved-ipv4-cidr")]
    ReservedIpv4Cidr,
    /// Named address range for private-service-access instances.
    #[strum(serialize = "reserved-ip-range")]
    ReservedIpRange,
}

impl Parameters {
    fn parse_cidr(value: Option<&String>) -> Result<Option<Ipv4Network>, SvcError> {
        match value {
            Some(value) => value
                .parse::<Ipv4Network>()
                .map(Some)
                .map_err(|source| SvcError::InvalidCidr {
                    cidr: value.clone(),
                    source,
                }),
            None => Ok(None),
        }
    }

    /// Parse the value for `Self::ReservedIpv4Cidr`.
    pub fn reserved_ipv4_cidr(value: Option<&String>) -> Result<Option<Ipv4Network>, SvcError> {
        Self::parse_cidr(value)
    }
}

/// Parameters of interest parsed from a create request.
#[derive(Debug, Clone, Default)]
pub struct CreateParams {
    reserved_ipv4_cidr: Option<Ipv4Network>,
    reserved_ip_range: Option<String>,
}

impl CreateParams {
    /// Get the `Parameters::ReservedIpv4Cidr` value.
    pub fn reserved_ipv4_cidr(&self) -> Option<Ipv4Network> {
        self.reserved_ipv4_cidr
    }
    /// Get the `Parameters::ReservedIpRange` value.
    pub fn reserved_ip_range(&self) -> Option<&str> {
        self.reserved_ip_range.as_deref()
    }
}

impl TryFrom<&HashMap<String, String>> for CreateParams {
    type Error = SvcError;

    fn try_from(args: &HashMap<String, String>) -> Result<Self, Self::Error> {
        let reserved_ipv4_cidr =
            Parameters::reserved_ipv4_cidr(args.get(Parameters::ReservedIpv4Cidr.as_ref()))?;
        let reserved_ip_range = args.get(Parameters::ReservedIpRange.as_ref()).cloned();
        Ok(Self {
            reserved_ipv4_cidr,
            reserved_ip_range,
        })
    }
}
