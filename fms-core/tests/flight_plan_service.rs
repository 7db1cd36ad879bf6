use std::path::Path;
use std::sync::Arc;

use fms_core::{
    FlightPlanService, PlanError, PlanField, PlanIndex, SlotLayout, StaticNavDatabase,
};

fn setup_service() -> FlightPlanService<StaticNavDatabase> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../configs/navdata.toml");
    let database = StaticNavDatabase::load(path).unwrap();
    FlightPlanService::new(Arc::new(database), SlotLayout::new(2))
}

async fn active_field(
    service: &FlightPlanService<StaticNavDatabase>,
    field: PlanField,
) -> Option<String> {
    service
        .store()
        .await
        .get(PlanIndex::Active)
        .unwrap()
        .field_ident(field)
        .map(str::to_string)
}

#[tokio::test]
async fn test_city_pair_is_accepted() {
    let service = setup_service();
    service
        .new_city_pair("CYUL", "LOWI", Some("LOWG"))
        .await
        .unwrap();

    assert!(!service.has_temporary().await);
    let current = service.current().await.unwrap();
    assert_eq!(current.field_ident(PlanField::OriginAirport), Some("CYUL"));
    assert_eq!(
        current.field_ident(PlanField::DestinationAirport),
        Some("LOWI")
    );
    assert_eq!(
        current.field_ident(PlanField::AlternateDestinationAirport),
        Some("LOWG")
    );
}

#[tokio::test]
async fn test_origin_runway_creates_temporary() {
    let service = setup_service();
    service
        .new_city_pair("CYUL", "LOWI", Some("LOWG"))
        .await
        .unwrap();
    service.set_origin_runway("RW06R").await.unwrap();

    assert!(service.has_temporary().await);
    let current = service.current().await.unwrap();
    assert_eq!(current.field_ident(PlanField::OriginRunway), Some("RW06R"));
    assert_eq!(active_field(&service, PlanField::OriginRunway).await, None);
}

#[tokio::test]
async fn test_temporary_delete_restores_active() {
    let service = setup_service();
    service
        .new_city_pair("CYUL", "LOWI", Some("LOWG"))
        .await
        .unwrap();
    service.set_origin_runway("RW06R").await.unwrap();

    service.temporary_delete().await.unwrap();

    assert!(!service.has_temporary().await);
    assert!(service.current().await.unwrap().origin_runway.is_none());
}

#[tokio::test]
async fn test_temporary_insert_promotes_draft() {
    let service = setup_service();
    service
        .new_city_pair("CYUL", "LOWI", Some("LOWG"))
        .await
        .unwrap();
    service.set_origin_runway("RW06R").await.unwrap();

    service.temporary_insert().await.unwrap();

    assert!(!service.has_temporary().await);
    let current = service.current().await.unwrap();
    assert_eq!(current.field_ident(PlanField::OriginRunway), Some("RW06R"));
    assert_eq!(
        active_field(&service, PlanField::OriginRunway).await.as_deref(),
        Some("RW06R")
    );
}

#[tokio::test]
async fn test_departure_after_commit_starts_new_draft() {
    let service = setup_service();
    service
        .new_city_pair("CYUL", "LOWI", Some("LOWG"))
        .await
        .unwrap();
    service.set_origin_runway("RW06R").await.unwrap();
    service.temporary_insert().await.unwrap();
    assert!(!service.has_temporary().await);

    service.set_departure_procedure("CYUL1").await.unwrap();

    assert!(service.has_temporary().await);
    let current = service.current().await.unwrap();
    assert_eq!(current.field_ident(PlanField::OriginRunway), Some("RW06R"));
    assert_eq!(current.field_ident(PlanField::Departure), Some("CYUL1"));
}

#[tokio::test]
async fn test_departure_enroute_transition_after_commit() {
    let service = setup_service();
    service
        .new_city_pair("CYYZ", "LOWI", Some("LOWG"))
        .await
        .unwrap();
    service.set_origin_runway("RW06R").await.unwrap();
    service.set_departure_procedure("AVSEP6").await.unwrap();
    service.temporary_insert().await.unwrap();
    assert!(!service.has_temporary().await);

    service
        .set_departure_enroute_transition("OTNIK")
        .await
        .unwrap();

    assert!(service.has_temporary().await);
    let current = service.current().await.unwrap();
    assert!(current.origin_runway.is_some());
    assert_eq!(
        current.field_ident(PlanField::DepartureEnrouteTransition),
        Some("OTNIK")
    );
}

#[tokio::test]
async fn test_destination_runway_and_arrival_after_commit() {
    let service = setup_service();
    service
        .new_city_pair("CYYZ", "LOWI", Some("LOWG"))
        .await
        .unwrap();
    service.set_origin_runway("RW06R").await.unwrap();
    service.set_departure_procedure("AVSEP6").await.unwrap();
    service
        .set_departure_enroute_transition("OTNIK")
        .await
        .unwrap();
    service.temporary_insert().await.unwrap();

    service.set_destination_runway("RW08").await.unwrap();
    assert!(service.has_temporary().await);
    service.temporary_insert().await.unwrap();

    service.set_arrival_procedure("BREN4B").await.unwrap();
    assert!(service.has_temporary().await);
    service.temporary_insert().await.unwrap();

    service.set_approach_procedure("R08-Y").await.unwrap();
    assert!(service.has_temporary().await);

    let current = service.current().await.unwrap();
    assert!(current.origin_runway.is_some());
    assert_eq!(current.field_ident(PlanField::DestinationRunway), Some("RW08"));
    assert_eq!(current.field_ident(PlanField::Arrival), Some("BREN4B"));
    assert_eq!(current.field_ident(PlanField::Approach), Some("R08-Y"));
    assert_eq!(active_field(&service, PlanField::Approach).await, None);
}

#[tokio::test]
async fn test_arrival_enroute_transition_after_commit() {
    let service = setup_service();
    service
        .new_city_pair("CYYZ", "KJFK", Some("KEWR"))
        .await
        .unwrap();
    service.set_origin_runway("RW06R").await.unwrap();
    service.set_departure_procedure("AVSEP6").await.unwrap();
    service
        .set_departure_enroute_transition("OTNIK")
        .await
        .unwrap();
    service.set_destination_runway("RW04L").await.unwrap();
    service.set_arrival_procedure("PARCH3").await.unwrap();
    service.temporary_insert().await.unwrap();
    assert!(!service.has_temporary().await);

    service
        .set_arrival_enroute_transition("PLYMM")
        .await
        .unwrap();

    assert!(service.has_temporary().await);
    let current = service.current().await.unwrap();
    assert!(current.origin_runway.is_some());
    assert_eq!(
        current.field_ident(PlanField::ArrivalEnrouteTransition),
        Some("PLYMM")
    );
}

#[tokio::test]
async fn test_approach_via_after_commit() {
    let service = setup_service();
    service
        .new_city_pair("CYYZ", "LGKR", Some("LGKO"))
        .await
        .unwrap();
    service.set_origin_runway("RW06R").await.unwrap();
    service.set_departure_procedure("AVSEP6").await.unwrap();
    service
        .set_departure_enroute_transition("OTNIK")
        .await
        .unwrap();
    service.set_destination_runway("RW34").await.unwrap();
    service.set_arrival_procedure("PARA1J").await.unwrap();
    service.set_approach_procedure("R34").await.unwrap();
    service.temporary_insert().await.unwrap();
    assert!(!service.has_temporary().await);

    service.set_approach_via("BEDEX").await.unwrap();

    assert!(service.has_temporary().await);
    let current = service.current().await.unwrap();
    assert!(current.origin_runway.is_some());
    assert_eq!(current.field_ident(PlanField::ApproachVia), Some("BEDEX"));
    assert_eq!(
        current
            .approach_via
            .as_ref()
            .map(|via| via.procedure_ident.as_str()),
        Some("R34")
    );
}

#[tokio::test]
async fn test_unknown_transition_is_rejected_without_draft() {
    let service = setup_service();
    service
        .new_city_pair("CYYZ", "LOWI", None)
        .await
        .unwrap();
    service.set_departure_procedure("AVSEP6").await.unwrap();
    service.temporary_insert().await.unwrap();

    let err = service
        .set_departure_enroute_transition("NOWHERE")
        .await
        .unwrap_err();

    assert!(matches!(err, PlanError::Lookup(_)));
    assert!(!service.has_temporary().await);
}

#[tokio::test]
async fn test_from_config_uses_layout_and_navdata() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../configs/fms.toml");
    let config = fms_core::load_fms_config(path).unwrap();
    let service = FlightPlanService::from_config(&config).unwrap();

    service.new_city_pair("KJFK", "KEWR", None).await.unwrap();
    service.reset_secondary(2).await.unwrap();
    assert!(matches!(
        service.reset_secondary(3).await,
        Err(PlanError::InvalidSlot {
            secondary_count: 3,
            ..
        })
    ));
}
