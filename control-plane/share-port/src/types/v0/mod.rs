/// Resource types exchanged with the cloud file API.
pub mod transport;
