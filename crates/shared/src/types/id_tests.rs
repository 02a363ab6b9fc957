use super::*;
use std::str::FromStr;
use uuid::Uuid;

#[test]
fn test_typed_id_creation() {
    let id = ComponentId::new();
    assert!(!id.to_string().is_empty());
}

#[test]
fn test_typed_id_from_uuid() {
    let uuid = Uuid::new_v4();
    let id = ReturnId::from_uuid(uuid);
    assert_eq!(id.into_inner(), uuid);
}

#[test]
fn test_typed_ids_are_unique() {
    assert_ne!(RepairId::new(), RepairId::new());
}

#[test]
fn test_typed_id_display() {
    let uuid = Uuid::new_v4();
    let id = ShipmentId::from_uuid(uuid);
    assert_eq!(format!("{id}"), uuid.to_string());
}

#[test]
fn test_typed_id_from_str() {
    let uuid = Uuid::new_v4();
    let id = BudgetEntryId::from_str(&uuid.to_string()).unwrap();
    assert_eq!(id.into_inner(), uuid);
}

#[test]
fn test_typed_id_from_str_error() {
    assert!(CompanyId::from_str("invalid").is_err());
}

#[test]
fn test_typed_id_serializes_transparently() {
    let uuid = Uuid::new_v4();
    let json = serde_json::to_value(StockMovementId::from_uuid(uuid)).unwrap();
    assert_eq!(json, serde_json::Value::String(uuid.to_string()));
}

#[test]
fn test_typed_id_uuid_conversions() {
    let uuid = Uuid::new_v4();
    let id: ComponentId = uuid.into();
    let back: Uuid = id.into();
    assert_eq!(back, uuid);
}
