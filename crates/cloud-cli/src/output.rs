//! Output formatting for CLI commands.
//!
//! Supports table (human-readable) and JSON output formats. JSON output is
//! the API's own representation of the resources.

use std::io::Write;

use cloud_api::{
    ClusterRecord, HealthReport, StorageClusterRecord, VersionInfo, VolumeRecord,
};
use cloud_dashboard::ui::humanize_size;
use serde::Serialize;

use crate::cli::Format;
use crate::error::CliError;

/// Output formatter that handles both table and JSON output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Write a serializable value to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TableDisplay,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)
                    .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
                writeln!(writer)?;
            }
            Format::Table => {
                value.write_table(writer)?;
            }
        }
        Ok(())
    }

    /// Write a serializable value to a string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_string<T>(&self, value: &T) -> Result<String, CliError>
    where
        T: Serialize + TableDisplay,
    {
        let mut buf = Vec::new();
        self.write(&mut buf, value)?;
        String::from_utf8(buf).map_err(|e| CliError::Format(format!("UTF-8 error: {e}")))
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Table)
    }
}

/// Trait for types that can be displayed as a table.
pub trait TableDisplay {
    /// Write the value as a human-readable table.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

fn size(bytes: Option<i64>) -> String {
    bytes.map_or_else(|| "-".to_string(), humanize_size)
}

/// Clusters for display.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct ClusterList {
    /// Clusters as returned by the API.
    pub clusters: Vec<ClusterRecord>,
}

impl TableDisplay for ClusterList {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        if self.clusters.is_empty() {
            writeln!(writer, "No clusters found")?;
            return Ok(());
        }

        writeln!(
            writer,
            "{:<36}  {:<12}  {:<12}  {:<10}  {:<12}  {:<12}",
            "ID", "NAME", "TENANT", "PARTITION", "PURPOSE", "OPERATION"
        )?;
        writeln!(writer, "{}", "─".repeat(110))?;

        for cluster in &self.clusters {
            let operation = cluster
                .status
                .as_ref()
                .and_then(|s| s.last_operation.as_ref())
                .and_then(|op| op.state.as_deref());
            writeln!(
                writer,
                "{:<36}  {:<12}  {:<12}  {:<10}  {:<12}  {:<12}",
                or_dash(cluster.id.as_deref()),
                truncate(or_dash(cluster.name.as_deref()), 12),
                truncate(or_dash(cluster.tenant.as_deref()), 12),
                truncate(or_dash(cluster.partition_id.as_deref()), 10),
                truncate(or_dash(cluster.purpose.as_deref()), 12),
                or_dash(operation),
            )?;
        }

        writeln!(writer)?;
        writeln!(writer, "Total: {} cluster(s)", self.clusters.len())?;
        Ok(())
    }
}

/// Volumes for display.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct VolumeList {
    /// Volumes as returned by the API.
    pub volumes: Vec<VolumeRecord>,
}

impl TableDisplay for VolumeList {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        if self.volumes.is_empty() {
            writeln!(writer, "No volumes found")?;
            return Ok(());
        }

        writeln!(
            writer,
            "{:<36}  {:<20}  {:>10}  {:>10}  {:<10}  {:<15}  {:<10}  {:>5}",
            "ID", "NAME", "SIZE", "USAGE", "STATE", "PROTECTION", "PARTITION", "HOSTS"
        )?;
        writeln!(writer, "{}", "─".repeat(132))?;

        for volume in &self.volumes {
            let usage = volume
                .statistics
                .as_ref()
                .and_then(|s| s.physical_used_storage);
            writeln!(
                writer,
                "{:<36}  {:<20}  {:>10}  {:>10}  {:<10}  {:<15}  {:<10}  {:>5}",
                or_dash(volume.volume_id.as_deref()),
                truncate(or_dash(volume.volume_name.as_deref()), 20),
                size(volume.size),
                size(usage),
                or_dash(volume.state.as_deref()),
                or_dash(volume.protection_state.as_deref()),
                truncate(or_dash(volume.partition_id.as_deref()), 10),
                volume.connected_hosts.len(),
            )?;
        }

        writeln!(writer)?;
        writeln!(writer, "Total: {} volume(s)", self.volumes.len())?;
        Ok(())
    }
}

/// A single volume in detail.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct VolumeDetail {
    /// Volume as returned by the API.
    pub volume: VolumeRecord,
}

impl TableDisplay for VolumeDetail {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        let v = &self.volume;
        writeln!(writer, "Volume: {}", or_dash(v.volume_id.as_deref()))?;
        writeln!(writer, "══════════════════════════════════════════════════")?;
        writeln!(writer)?;
        writeln!(writer, "General")?;
        writeln!(writer, "  Name:           {}", or_dash(v.volume_name.as_deref()))?;
        writeln!(writer, "  Tenant:         {}", or_dash(v.tenant_id.as_deref()))?;
        writeln!(writer, "  Project:        {}", or_dash(v.project_id.as_deref()))?;
        writeln!(writer, "  Partition:      {}", or_dash(v.partition_id.as_deref()))?;
        writeln!(writer)?;
        writeln!(writer, "State")?;
        writeln!(writer, "  State:          {}", or_dash(v.state.as_deref()))?;
        writeln!(writer, "  Protection:     {}", or_dash(v.protection_state.as_deref()))?;
        writeln!(writer)?;
        writeln!(writer, "Storage")?;
        writeln!(writer, "  Size:           {}", size(v.size))?;
        let stats = v.statistics.as_ref();
        writeln!(
            writer,
            "  Physical Used:  {}",
            size(stats.and_then(|s| s.physical_used_storage))
        )?;
        writeln!(
            writer,
            "  Logical Used:   {}",
            size(stats.and_then(|s| s.logical_used_storage))
        )?;
        writeln!(writer)?;

        if v.connected_hosts.is_empty() {
            writeln!(writer, "Connected Hosts: None")?;
        } else {
            writeln!(writer, "Connected Hosts ({}):", v.connected_hosts.len())?;
            for host in &v.connected_hosts {
                writeln!(writer, "  {host}")?;
            }
        }
        Ok(())
    }
}

/// Storage clusters for display.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct StorageClusterList {
    /// Storage clusters as returned by the API.
    pub clusters: Vec<StorageClusterRecord>,
}

impl TableDisplay for StorageClusterList {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        if self.clusters.is_empty() {
            writeln!(writer, "No storage clusters found")?;
            return Ok(());
        }

        writeln!(
            writer,
            "{:<36}  {:<10}  {:<8}  {:>7}  {:>10}  {:>10}  {:>11}",
            "UUID", "PARTITION", "HEALTH", "SERVERS", "FREE", "USED", "COMPRESSION"
        )?;
        writeln!(writer, "{}", "─".repeat(104))?;

        for cluster in &self.clusters {
            let health = cluster.health.as_ref().and_then(|h| h.state.as_deref());
            let enabled = cluster
                .servers
                .iter()
                .filter(|s| s.state.as_deref() == Some("Enabled"))
                .count();
            let stats = cluster.statistics.as_ref();
            let compression = stats
                .and_then(|s| s.compression_ratio)
                .map_or_else(|| "-".to_string(), |r| format!("{r:.2}"));
            writeln!(
                writer,
                "{:<36}  {:<10}  {:<8}  {:>7}  {:>10}  {:>10}  {:>11}",
                or_dash(cluster.uuid.as_deref()),
                truncate(or_dash(cluster.partition.as_deref()), 10),
                or_dash(health),
                format!("{enabled}/{}", cluster.servers.len()),
                size(stats.and_then(|s| s.free_physical_storage)),
                size(stats.and_then(|s| s.physical_used_storage)),
                compression,
            )?;
        }
        Ok(())
    }
}

/// API health for display.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct HealthOutput {
    /// Health report as returned by the API.
    pub report: HealthReport,
}

impl TableDisplay for HealthOutput {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "API Health:       {}", self.report.status)?;
        if !self.report.message.is_empty() {
            writeln!(writer, "Message:          {}", self.report.message)?;
        }
        Ok(())
    }
}

/// Client and server versions.
#[derive(Debug, Clone, Serialize)]
pub struct VersionOutput {
    /// Version of this binary.
    pub client: String,
    /// Version of the API server, if it could be reached.
    pub server: Option<VersionInfo>,
}

impl TableDisplay for VersionOutput {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Client:           cloudctl {}", self.client)?;
        match &self.server {
            Some(server) => {
                writeln!(writer, "Server:           cloud-api {}", server.version)?;
                if let Some(revision) = &server.revision {
                    writeln!(writer, "  Revision:       {revision}")?;
                }
                if let Some(sha) = &server.git_sha1 {
                    writeln!(writer, "  Git SHA:        {sha}")?;
                }
                if let Some(date) = &server.build_date {
                    writeln!(writer, "  Build Date:     {date}")?;
                }
            }
            None => writeln!(writer, "Server:           unreachable")?,
        }
        Ok(())
    }
}

/// Truncate a string to a maximum number of characters.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    } else {
        s.chars().take(max_len).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloud_api::{
        ClusterStatus, HealthStatus, LastOperation, StorageClusterHealth,
        StorageClusterStatistics, StorageServer, VolumeStatistics,
    };

    fn volume() -> VolumeRecord {
        VolumeRecord {
            volume_id: Some("vol-1".into()),
            volume_name: Some("data".into()),
            tenant_id: Some("t1".into()),
            size: Some(10 * 1024 * 1024 * 1024),
            state: Some("Available".into()),
            protection_state: Some("FullyProtected".into()),
            statistics: Some(VolumeStatistics {
                physical_used_storage: Some(1536),
                logical_used_storage: None,
            }),
            connected_hosts: vec!["worker-1".into()],
            ..VolumeRecord::default()
        }
    }

    #[test]
    fn truncate_short_string() {
        assert_eq!(truncate("hello", 10), "hello");
    }

    #[test]
    fn truncate_exact_length() {
        assert_eq!(truncate("hello", 5), "hello");
    }

    #[test]
    fn truncate_long_string() {
        assert_eq!(truncate("hello world", 8), "hello...");
    }

    #[test]
    fn truncate_very_short_max() {
        assert_eq!(truncate("hello", 3), "hel");
    }

    #[test]
    fn truncate_multibyte() {
        assert_eq!(truncate("größenwahn", 6), "grö...");
    }

    #[test]
    fn cluster_table_shows_operation() {
        let list = ClusterList {
            clusters: vec![ClusterRecord {
                id: Some("c-1".into()),
                name: Some("prod".into()),
                status: Some(ClusterStatus {
                    last_operation: Some(LastOperation {
                        state: Some("Succeeded".into()),
                        ..LastOperation::default()
                    }),
                    ..ClusterStatus::default()
                }),
                ..ClusterRecord::default()
            }],
        };
        let out = OutputFormat::default().to_string(&list).expect("table");
        assert!(out.contains("OPERATION"));
        assert!(out.contains("prod"));
        assert!(out.contains("Succeeded"));
        assert!(out.contains("Total: 1 cluster(s)"));
    }

    #[test]
    fn empty_lists_say_so() {
        let format = OutputFormat::default();
        let clusters = format.to_string(&ClusterList { clusters: vec![] }).expect("table");
        assert_eq!(clusters, "No clusters found\n");
        let volumes = format.to_string(&VolumeList { volumes: vec![] }).expect("table");
        assert_eq!(volumes, "No volumes found\n");
    }

    #[test]
    fn volume_table_humanizes_sizes() {
        let out = OutputFormat::default()
            .to_string(&VolumeList { volumes: vec![volume()] })
            .expect("table");
        assert!(out.contains("10.0 GiB"));
        assert!(out.contains("1.5 KiB"));
        assert!(out.contains("FullyProtected"));
    }

    #[test]
    fn volume_detail_lists_hosts() {
        let out = OutputFormat::default()
            .to_string(&VolumeDetail { volume: volume() })
            .expect("table");
        assert!(out.contains("Volume: vol-1"));
        assert!(out.contains("Logical Used:   -"));
        assert!(out.contains("Connected Hosts (1):"));
        assert!(out.contains("  worker-1"));
    }

    #[test]
    fn json_output_is_api_representation() {
        let format = OutputFormat::new(Format::Json);
        let out = format
            .to_string(&VolumeList { volumes: vec![volume()] })
            .expect("json");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("valid json");
        assert_eq!(parsed[0]["volume_id"], "vol-1");
        assert_eq!(parsed[0]["connected_hosts"][0], "worker-1");
    }

    #[test]
    fn storage_table_counts_enabled_servers() {
        let list = StorageClusterList {
            clusters: vec![StorageClusterRecord {
                uuid: Some("sc-1".into()),
                health: Some(StorageClusterHealth {
                    state: Some("OK".into()),
                }),
                servers: vec![
                    StorageServer {
                        name: Some("s1".into()),
                        state: Some("Enabled".into()),
                    },
                    StorageServer {
                        name: Some("s2".into()),
                        state: Some("Failed".into()),
                    },
                ],
                statistics: Some(StorageClusterStatistics {
                    free_physical_storage: Some(1024),
                    physical_used_storage: None,
                    compression_ratio: Some(1.25),
                }),
                ..StorageClusterRecord::default()
            }],
        };
        let out = OutputFormat::default().to_string(&list).expect("table");
        assert!(out.contains("1/2"));
        assert!(out.contains("1.0 KiB"));
        assert!(out.contains("1.25"));
    }

    #[test]
    fn health_shows_message_when_set() {
        let out = OutputFormat::default()
            .to_string(&HealthOutput {
                report: HealthReport {
                    status: HealthStatus::Unhealthy,
                    message: "database unreachable".into(),
                },
            })
            .expect("table");
        assert!(out.contains("API Health:       unhealthy"));
        assert!(out.contains("Message:          database unreachable"));
    }

    #[test]
    fn version_without_server() {
        let out = OutputFormat::default()
            .to_string(&VersionOutput {
                client: "0.1.0".into(),
                server: None,
            })
            .expect("table");
        assert!(out.contains("cloudctl 0.1.0"));
        assert!(out.contains("unreachable"));
    }
}
