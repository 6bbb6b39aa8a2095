//! Writes one audit row per terminal file outcome.

use log::{error, info, warn};

use crate::config::ChannelConfiguration;
use crate::db::{DatabaseError, NewProcessRecord, PersistenceGateway, ProcessStatus};
use crate::validator::{ParsedPlaylist, RejectReason};

pub struct ProcessRecorder<G> {
    gateway: G,
    channel_id: String,
    input_location: String,
    output_location: String,
    created_by: String,
    updated_by: String,
}

impl<G: PersistenceGateway> ProcessRecorder<G> {
    pub fn new(gateway: G, config: &ChannelConfiguration) -> Self {
        Self {
            gateway,
            channel_id: config.channel_id.clone(),
            input_location: config.input_location_str(),
            output_location: config.output_location_str(),
            created_by: config.created_by.clone(),
            updated_by: config.updated_by.clone(),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn into_gateway(self) -> G {
        self.gateway
    }

    pub fn accepted_record(&self, filename: &str, parsed: &ParsedPlaylist) -> NewProcessRecord {
        NewProcessRecord {
            channel_id: self.channel_id.clone(),
            filename: filename.to_string(),
            version: parsed.version.clone(),
            input_path: self.input_location.clone(),
            output_path: self.output_location.clone(),
            playlist_date: Some(parsed.canonical_date()),
            status: ProcessStatus::Accepted,
            remarks: None,
            created_by: self.created_by.clone(),
            updated_by: self.updated_by.clone(),
        }
    }

    pub fn rejected_record(
        &self,
        filename: &str,
        version: &str,
        reason: RejectReason,
    ) -> NewProcessRecord {
        NewProcessRecord {
            channel_id: self.channel_id.clone(),
            filename: filename.to_string(),
            version: version.to_string(),
            input_path: self.input_location.clone(),
            output_path: self.output_location.clone(),
            playlist_date: None,
            status: ProcessStatus::Rejected,
            remarks: Some(reason.to_string()),
            created_by: self.created_by.clone(),
            updated_by: self.updated_by.clone(),
        }
    }

    /// Records an accepted (already moved) file. Returns false if the write failed.
    pub fn record_accepted(&self, filename: &str, parsed: &ParsedPlaylist) -> bool {
        let record = self.accepted_record(filename, parsed);
        match self.write(&record) {
            Ok(()) => {
                info!(
                    "File {} processed successfully and added to playlist_process",
                    filename
                );
                true
            }
            Err(_) => false,
        }
    }

    /// Records a rejected file. Returns false if the write failed.
    pub fn record_rejected(&self, filename: &str, version: &str, reason: RejectReason) -> bool {
        warn!("Validation failed for {}: {}", filename, reason);
        let record = self.rejected_record(filename, version, reason);
        self.write(&record).is_ok()
    }

    fn write(&self, record: &NewProcessRecord) -> Result<(), DatabaseError> {
        self.gateway.insert_process_record(record).map_err(|e| {
            error!(
                "Failed to record outcome for {} (status {}): {}",
                record.filename,
                record.status.code(),
                e
            );
            e
        })
    }
}
