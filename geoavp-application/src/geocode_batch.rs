use std::collections::HashSet;

use geoavp_core::{
    gateways::{console::OperatorConsole, geocode::GeocodingGateway, map::MapGateway},
    usecases,
};
use geoavp_entities::{provenance::Provenance, record::Record};

use crate::Result;

const STAGE_PRIMARY_BANNER: &str = "- Comienzo de la geocodificación con el servicio OpenCage -";
const STAGE_SECONDARY_BANNER: &str =
    "- Comienzo de la geocodificación con el servicio ESRI de ArcGis -";

/// Everything the pipeline talks to. The binary wires the real
/// gateways in here, the tests their scripted doubles.
pub struct PipelineContext<'a> {
    pub primary: &'a dyn GeocodingGateway,
    pub secondary: &'a dyn GeocodingGateway,
    pub map: &'a dyn MapGateway,
    pub console: &'a mut dyn OperatorConsole,
}

/// Outcome of one run, grouped by how each record was resolved.
#[derive(Debug, Default)]
pub struct Buckets {
    /// Records whose address cell was empty. Never geocoded.
    pub no_address: Vec<Record>,
    /// Accepted by the operator after the primary stage.
    pub opencage: Vec<Record>,
    /// Handled by the secondary stage, including records the operator
    /// rejected there (those keep no coordinates).
    pub esri: Vec<Record>,
    /// Neither provider returned usable coordinates.
    pub unresolved: Vec<Record>,
}

impl Buckets {
    pub fn len(&self) -> usize {
        self.no_address.len() + self.opencage.len() + self.esri.len() + self.unresolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flattens the buckets into the order the output file uses.
    pub fn into_merged(self) -> Vec<Record> {
        let mut merged = self.no_address;
        merged.extend(self.opencage);
        merged.extend(self.esri);
        merged.extend(self.unresolved);
        merged
    }
}

/// Runs the whole two-stage pipeline over a batch of records.
///
/// Every input record ends up in exactly one bucket. The primary
/// provider is skipped for intersection queries, which it cannot
/// resolve; those go straight to the secondary stage together with
/// everything the primary stage failed on or the operator rejected.
pub fn geocode_batch(records: Vec<Record>, ctx: &mut PipelineContext) -> Result<Buckets> {
    let input_count = records.len();
    let mut buckets = Buckets::default();

    let (mut pending, no_address): (Vec<_>, Vec<_>) =
        records.into_iter().partition(Record::has_address);
    buckets.no_address = no_address;
    if !buckets.no_address.is_empty() {
        log::info!(
            "{} of {} records have no address and will not be geocoded",
            buckets.no_address.len(),
            input_count
        );
    }

    usecases::normalize_records(&mut pending);

    // Stage 1: primary provider.
    ctx.console.info(STAGE_PRIMARY_BANNER);
    resolve_stage(&mut pending, ctx.primary, Provenance::OpenCage, true);

    let (mut stage1, mut remaining): (Vec<_>, Vec<_>) =
        pending.into_iter().partition(|r| r.pos.is_some());
    let wrong = usecases::verify_geocoding(&stage1, ctx.map, &mut *ctx.console)?;
    for mut record in stage1.drain(..) {
        if wrong.contains(&record.id) {
            record.clear_pos();
            remaining.push(record);
        } else {
            buckets.opencage.push(record);
        }
    }
    log::info!(
        "Primary stage resolved {} records, {} remaining",
        buckets.opencage.len(),
        remaining.len()
    );

    // Stage 2: secondary provider for everything still open.
    ctx.console.info(STAGE_SECONDARY_BANNER);
    resolve_stage(&mut remaining, ctx.secondary, Provenance::Esri, false);

    let (mut stage2, unresolved): (Vec<_>, Vec<_>) =
        remaining.into_iter().partition(|r| r.pos.is_some());
    buckets.unresolved = unresolved;
    let wrong = usecases::verify_geocoding(&stage2, ctx.map, &mut *ctx.console)?;
    for record in &mut stage2 {
        if wrong.contains(&record.id) {
            record.clear_pos();
        }
    }
    buckets.esri = stage2;
    log::info!(
        "Secondary stage handled {} records, {} left unresolved",
        buckets.esri.len(),
        buckets.unresolved.len()
    );

    if buckets.len() != input_count {
        log::error!(
            "Record count mismatch after merge: {} in, {} out",
            input_count,
            buckets.len()
        );
    }
    Ok(buckets)
}

fn resolve_stage(
    records: &mut [Record],
    geocoder: &dyn GeocodingGateway,
    provenance: Provenance,
    skip_intersections: bool,
) {
    for record in records {
        let Some(query) = record.query.as_deref() else {
            continue;
        };
        if skip_intersections && usecases::contains_intersection(query) {
            log::debug!("Skipping intersection query for {}: {}", record.id, query);
            continue;
        }
        match geocoder.resolve_query_lat_lng(query) {
            Ok(pos) => match usecases::sanitize_position(pos) {
                Some(pos) => {
                    record.pos = Some(pos);
                    record.provenance = provenance;
                }
                None => {
                    log::debug!("Discarding placeholder coordinates for {}: {}", record.id, query);
                }
            },
            Err(err) => {
                log::debug!("Can not geocode address for {} ({}): {}", record.id, query, err);
            }
        }
    }
}
