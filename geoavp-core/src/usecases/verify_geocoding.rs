use std::collections::HashSet;

use geoavp_entities::record::{Record, RecordId};

use crate::{
    gateways::{
        console::{OperatorConsole, TERMINATOR},
        map::{MapGateway, MapMarker, RenderError},
    },
    usecases::Error,
};

const MENU_PROMPT: &str = "¿Qué modificaciones desea realizar?";
const MENU_OPTIONS: &[&str] = &[
    "Agregar a las observaciones erroneamente geocodificadas un nuevo ID.",
    "Eliminar de las observaciones erroneamente geocodificadas un ID.",
    "Confirmar los cambios y continuar.",
];
const CONFIRM_PROMPT: &str = "¿Desea confirmar los cambios y continuar? ('si/no')";

/// Interactive verification of one provider stage.
///
/// Renders all geocoded records on the map, lets the operator add ids
/// to / remove ids from the wrong-set and re-renders after every change
/// until the operator explicitly confirms. Returns the final wrong-set.
///
/// All passed records must carry coordinates; the caller filters out
/// the rest beforehand.
pub fn verify_geocoding(
    records: &[Record],
    map: &dyn MapGateway,
    console: &mut dyn OperatorConsole,
) -> Result<HashSet<RecordId>, RenderError> {
    let mut wrong = HashSet::new();
    if records.is_empty() {
        return Ok(wrong);
    }

    let right: HashSet<RecordId> = records.iter().map(|r| r.id.clone()).collect();
    let expected_len = records[0].id.len();

    render(records, &wrong, map)?;
    collect_additions(&right, &mut wrong, expected_len, console);

    loop {
        render(records, &wrong, map)?;

        if console.confirm(CONFIRM_PROMPT) {
            console.info("Cambios confirmados.");
            break;
        }
        match console.choose(MENU_PROMPT, MENU_OPTIONS) {
            0 => collect_additions(&right, &mut wrong, expected_len, console),
            1 => collect_removals(&mut wrong, expected_len, console),
            _ => {
                console.info("Cambios confirmados.");
                break;
            }
        }
    }

    log::debug!(
        "Verification finished: {} of {} records flagged as wrong",
        wrong.len(),
        records.len()
    );
    Ok(wrong)
}

fn render(
    records: &[Record],
    wrong: &HashSet<RecordId>,
    map: &dyn MapGateway,
) -> Result<(), RenderError> {
    let mut markers = Vec::with_capacity(records.len());
    for record in records {
        let Some(pos) = record.pos else {
            return Err(RenderError::MissingCoordinates(record.id.to_string()));
        };
        markers.push(MapMarker {
            id: record.id.clone(),
            label: format!(
                "{}: {}",
                record.id,
                record.raw_address.as_deref().unwrap_or_default()
            ),
            pos,
            flagged: wrong.contains(&record.id),
        });
    }
    map.render_markers(&markers)
}

/// Parses one line of operator input: the terminator token yields
/// `None`, anything else must be a record id of the expected width.
pub fn parse_operator_id(input: &str, expected_len: usize) -> Result<Option<RecordId>, Error> {
    let input = input.trim();
    if input == TERMINATOR {
        return Ok(None);
    }
    if input.len() != expected_len {
        return Err(Error::IdLength {
            expected: expected_len,
        });
    }
    input
        .parse::<RecordId>()
        .map(Some)
        .map_err(|_| Error::IdNotNumeric)
}

fn collect_additions(
    right: &HashSet<RecordId>,
    wrong: &mut HashSet<RecordId>,
    expected_len: usize,
    console: &mut dyn OperatorConsole,
) {
    loop {
        let line = console.prompt_line(
            "Ingrese un ID para agregar a las direcciones erroneamente geocodificadas \
             ('t' para terminar):",
        );
        match parse_operator_id(&line, expected_len) {
            Ok(None) => break,
            Ok(Some(id)) => {
                if !right.contains(&id) {
                    console.info(
                        "ID no presente entre las direcciones geocodificadas. Intente nuevamente.",
                    );
                    continue;
                }
                // Re-adding an id is a no-op.
                wrong.insert(id);
                console.info("ID aceptado");
            }
            Err(err) => console.info(&err.to_string()),
        }
    }
}

fn collect_removals(
    wrong: &mut HashSet<RecordId>,
    expected_len: usize,
    console: &mut dyn OperatorConsole,
) {
    loop {
        let line = console.prompt_line(
            "Ingrese un ID a eliminar de las direcciones erroneamente geocodificadas \
             ('t' para terminar):",
        );
        match parse_operator_id(&line, expected_len) {
            Ok(None) => break,
            Ok(Some(id)) => {
                if !wrong.remove(&id) {
                    console.info(
                        "ID no presente entre las direcciones erroneamente geocodificadas. \
                         Intente nuevamente.",
                    );
                    continue;
                }
                console.info("ID aceptado");
            }
            Err(err) => console.info(&err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateways::console::ScriptedConsole;
    use geoavp_entities::geo::MapPoint;
    use std::cell::RefCell;

    #[derive(Default)]
    struct MockMap {
        renders: RefCell<Vec<Vec<MapMarker>>>,
    }

    impl MapGateway for MockMap {
        fn render_markers(&self, markers: &[MapMarker]) -> Result<(), RenderError> {
            self.renders.borrow_mut().push(markers.to_vec());
            Ok(())
        }
    }

    fn geocoded(id: &str) -> Record {
        let mut r = Record::new(id.parse().unwrap(), Some(format!("calle {id}")));
        r.pos = MapPoint::try_from_lat_lng_deg(-32.95, -60.65);
        r
    }

    #[test]
    fn empty_stage_needs_no_confirmation() {
        let map = MockMap::default();
        let mut console = ScriptedConsole::default();
        let wrong = verify_geocoding(&[], &map, &mut console).unwrap();
        assert!(wrong.is_empty());
        assert!(map.renders.borrow().is_empty());
    }

    #[test]
    fn confirm_without_changes() {
        let records = vec![geocoded("2306001"), geocoded("2306002")];
        let map = MockMap::default();
        let mut console = ScriptedConsole::new(["t", "si"]);
        let wrong = verify_geocoding(&records, &map, &mut console).unwrap();
        assert!(wrong.is_empty());
        // Initial render plus the pre-confirmation one.
        assert_eq!(map.renders.borrow().len(), 2);
        assert!(map.renders.borrow()[1].iter().all(|m| !m.flagged));
    }

    #[test]
    fn add_flags_marker_on_next_render() {
        let records = vec![geocoded("2306001"), geocoded("2306002")];
        let map = MockMap::default();
        let mut console = ScriptedConsole::new(["2306002", "t", "si"]);
        let wrong = verify_geocoding(&records, &map, &mut console).unwrap();
        assert_eq!(wrong.len(), 1);
        assert!(wrong.contains("2306002"));
        let renders = map.renders.borrow();
        let last = renders.last().unwrap();
        assert!(last.iter().any(|m| m.flagged && m.id.as_str() == "2306002"));
        assert!(last.iter().any(|m| !m.flagged && m.id.as_str() == "2306001"));
    }

    #[test]
    fn add_then_remove_is_net_neutral() {
        let records = vec![geocoded("2306001")];
        let map = MockMap::default();
        let mut console =
            ScriptedConsole::new(["2306001", "t", "no", "b", "2306001", "t", "si"]);
        let wrong = verify_geocoding(&records, &map, &mut console).unwrap();
        assert!(wrong.is_empty());
    }

    #[test]
    fn duplicate_add_is_a_no_op() {
        let records = vec![geocoded("2306001")];
        let map = MockMap::default();
        let mut console = ScriptedConsole::new(["2306001", "2306001", "t", "si"]);
        let wrong = verify_geocoding(&records, &map, &mut console).unwrap();
        assert_eq!(wrong.len(), 1);
    }

    #[test]
    fn unknown_and_malformed_ids_reprompt() {
        let records = vec![geocoded("2306001")];
        let map = MockMap::default();
        // Wrong length, non-numeric, not in the right-set, then done.
        let mut console = ScriptedConsole::new(["123", "23o60x1", "9999999", "t", "si"]);
        let wrong = verify_geocoding(&records, &map, &mut console).unwrap();
        assert!(wrong.is_empty());
    }

    #[test]
    fn removing_an_absent_id_does_not_end_the_session() {
        let records = vec![geocoded("2306001"), geocoded("2306002")];
        let map = MockMap::default();
        let mut console = ScriptedConsole::new([
            "2306001", "t", // add phase
            "no", "b", // menu: remove
            "2306002", // not in the wrong-set
            "t", "si",
        ]);
        let wrong = verify_geocoding(&records, &map, &mut console).unwrap();
        assert_eq!(wrong.len(), 1);
        assert!(wrong.contains("2306001"));
    }

    #[test]
    fn wrong_set_is_subset_of_right_set() {
        let records = vec![geocoded("2306001"), geocoded("2306002")];
        let map = MockMap::default();
        let mut console = ScriptedConsole::new(["2306001", "9999999", "t", "si"]);
        let wrong = verify_geocoding(&records, &map, &mut console).unwrap();
        assert!(wrong
            .iter()
            .all(|id| records.iter().any(|r| r.id == *id)));
    }

    #[test]
    fn record_without_coordinates_is_an_invariant_violation() {
        let mut record = geocoded("2306001");
        record.pos = None;
        let map = MockMap::default();
        let mut console = ScriptedConsole::default();
        let err = verify_geocoding(&[record], &map, &mut console).unwrap_err();
        assert!(matches!(err, RenderError::MissingCoordinates(_)));
    }

    #[test]
    fn operator_id_parsing() {
        assert_eq!(parse_operator_id("t", 7), Ok(None));
        assert_eq!(parse_operator_id(" t ", 7), Ok(None));
        assert!(parse_operator_id("2306001", 7).unwrap().is_some());
        assert_eq!(
            parse_operator_id("123", 7),
            Err(Error::IdLength { expected: 7 })
        );
        assert_eq!(parse_operator_id("23x6001", 7), Err(Error::IdNotNumeric));
    }
}
