//! Demo data seeder for local development.
//!
//! Seeds companies, components (with opening stock), returns, repairs,
//! shipments, and one week of budget entries into the configured backend.
//! Rows that already exist are skipped, so the seeder can be re-run.
//!
//! Usage: cargo run --bin seeder

use std::collections::{HashMap, HashSet};

use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use warehouse_core::budget::NewBudgetEntry;
use warehouse_core::company::NewCompany;
use warehouse_core::inventory::NewComponent;
use warehouse_core::repair::{NewRepair, NewRepairComponent};
use warehouse_core::returns::NewReturn;
use warehouse_core::shipment::NewShipment;
use warehouse_core::{RepairPriority, ShipmentType, WorkStatus};
use warehouse_db::{
    BudgetFilter, BudgetRepository, CompanyRepository, ComponentRepository,
    RepairComponentRepository, RepairFilter, RepairRepository, ReturnFilter, ReturnRepository,
    SharedBackend, ShipmentFilter, ShipmentRepository,
};
use warehouse_shared::AppConfig;
use warehouse_shared::types::{CompanyId, ComponentId};

/// Week the demo budget belongs to.
const BUDGET_WEEK: &str = "2025-08-05";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;

    println!("Connecting to backend...");
    let backend = warehouse_db::connect(&config.backend)?;

    println!("Seeding companies...");
    let companies = seed_companies(&backend).await?;

    println!("Seeding components...");
    let components = seed_components(&backend).await?;

    println!("Seeding returns...");
    seed_returns(&backend, &companies).await?;

    println!("Seeding repairs...");
    seed_repairs(&backend, &components).await?;

    println!("Seeding shipments...");
    seed_shipments(&backend).await?;

    println!("Seeding budget entries...");
    seed_budget(&backend).await?;

    println!("Seeding complete!");
    Ok(())
}

fn date(s: &str) -> anyhow::Result<NaiveDate> {
    s.parse().with_context(|| format!("bad date {s}"))
}

fn instant(s: &str) -> anyhow::Result<DateTime<Utc>> {
    Ok(date(s)?.and_time(chrono::NaiveTime::MIN).and_utc())
}

/// Seeds the three customer companies. Returns their ids by name.
async fn seed_companies(backend: &SharedBackend) -> anyhow::Result<HashMap<String, CompanyId>> {
    let repo = CompanyRepository::new(backend.clone());
    let mut ids: HashMap<String, CompanyId> = repo
        .list(None)
        .await?
        .into_iter()
        .map(|c| (c.name, c.id))
        .collect();

    let seeds = [
        ("TechCorp Inc.", "John Smith", "returns@techcorp.example"),
        ("Global Logistics", "Maria Garcia", "rma@globallogistics.example"),
        ("MegaMart", "David Lee", "service@megamart.example"),
    ];
    for (name, contact, email) in seeds {
        if ids.contains_key(name) {
            println!("  {name} already exists, skipping...");
            continue;
        }
        let company = repo
            .create(NewCompany {
                name: name.to_string(),
                contact_person: Some(contact.to_string()),
                email: Some(email.to_string()),
                ..NewCompany::default()
            })
            .await?;
        println!("  Created {name}");
        ids.insert(company.name, company.id);
    }
    Ok(ids)
}

/// Seeds the four demo components. Two of them start below their reorder
/// level so the overview has alerts to show. Returns their ids by SKU.
async fn seed_components(backend: &SharedBackend) -> anyhow::Result<HashMap<&'static str, ComponentId>> {
    let repo = ComponentRepository::new(backend.clone());
    let seeds = [
        ("Motor Assembly", "PWH-MOT-001", "Motors", 45, 15, dec!(125.50), "Motor Dynamics LLC"),
        ("Control Board", "PWH-PCB-001", "Electronics", 5, 8, dec!(89.99), "Circuit Solutions Inc"),
        ("Power Cable", "PWH-CAB-001", "Cables", 156, 25, dec!(15.75), "Cable Works Ltd"),
        ("Sensor Unit", "PWH-SEN-001", "Sensors", 8, 12, dec!(67.25), "Sensor Tech Corp"),
    ];

    let mut ids = HashMap::new();
    for (name, sku, category, stock, reorder, unit_cost, supplier) in seeds {
        if let Some(existing) = repo.find_by_sku(sku).await? {
            println!("  {sku} already exists, skipping...");
            ids.insert(sku, existing.id);
            continue;
        }
        let component = repo
            .create(NewComponent {
                sku: sku.to_string(),
                name: name.to_string(),
                category: Some(category.to_string()),
                current_stock: stock,
                minimum_stock: reorder / 2,
                reorder_level: reorder,
                unit_cost,
                supplier: Some(supplier.to_string()),
                description: None,
            })
            .await?;
        println!("  Created {sku} ({stock} in stock)");
        ids.insert(sku, component.id);
    }
    Ok(ids)
}

async fn seed_returns(
    backend: &SharedBackend,
    companies: &HashMap<String, CompanyId>,
) -> anyhow::Result<()> {
    let repo = ReturnRepository::new(backend.clone());
    let existing: HashSet<String> = repo
        .list(&ReturnFilter::default(), None)
        .await?
        .into_iter()
        .map(|r| r.record.return_id)
        .collect();

    let seeds = [
        ("RET-2025-001", "TechCorp Inc.", "2025-08-07", 5, dec!(1250.50), WorkStatus::InProgress, "Defective units"),
        ("RET-2025-002", "Global Logistics", "2025-08-06", 12, dec!(2450.75), WorkStatus::Completed, "Wrong model shipped"),
        ("RET-2025-003", "MegaMart", "2025-08-05", 3, dec!(675.25), WorkStatus::Pending, "Damaged in transit"),
    ];
    for (code, company, day, items, value, status, reason) in seeds {
        if existing.contains(code) {
            println!("  {code} already exists, skipping...");
            continue;
        }
        repo.create(NewReturn {
            return_id: code.to_string(),
            company_id: companies.get(company).copied(),
            return_date: date(day)?,
            reason: Some(reason.to_string()),
            total_items: items,
            total_value: value,
            status,
            notes: None,
        })
        .await?;
        println!("  Created {code}");
    }
    Ok(())
}

async fn seed_repairs(
    backend: &SharedBackend,
    components: &HashMap<&'static str, ComponentId>,
) -> anyhow::Result<()> {
    let repo = RepairRepository::new(backend.clone());
    let lines = RepairComponentRepository::new(backend.clone());
    let existing: HashSet<String> = repo
        .list(&RepairFilter::default(), None)
        .await?
        .into_iter()
        .map(|r| r.repair.repair_id)
        .collect();

    let seeds = [
        (
            "SRV-001", "John Smith", "PWH-Model-X", "Motor not starting",
            RepairPriority::High, WorkStatus::InProgress, "Mike Johnson",
            dec!(120.00), dec!(125.50), "2025-08-04",
        ),
        (
            "SRV-002", "Sarah Wilson", "PWH-Model-Y", "Intermittent sensor readings",
            RepairPriority::Medium, WorkStatus::Pending, "Lisa Chen",
            dec!(100.00), dec!(89.25), "2025-08-06",
        ),
    ];
    for (code, customer, model, issue, priority, status, technician, labor, parts, start) in seeds {
        if existing.contains(code) {
            println!("  {code} already exists, skipping...");
            continue;
        }
        let repair = repo
            .create(NewRepair {
                repair_id: code.to_string(),
                customer_name: Some(customer.to_string()),
                device_model: Some(model.to_string()),
                issue_description: issue.to_string(),
                priority,
                status,
                assigned_technician: Some(technician.to_string()),
                start_date: Some(instant(start)?),
                estimated_completion: None,
                labor_cost: labor,
                parts_cost: parts,
                notes: None,
            })
            .await?;
        println!("  Created {code} (total {})", repair.cost());

        // SRV-001 used one motor assembly.
        if code == "SRV-001"
            && let Some(motor) = components.get("PWH-MOT-001")
        {
            lines
                .create(
                    repair.id,
                    NewRepairComponent {
                        component_id: *motor,
                        quantity_needed: 1,
                        quantity_used: 1,
                        cost_per_unit: dec!(125.50),
                        notes: None,
                    },
                )
                .await?;
        }
    }
    Ok(())
}

async fn seed_shipments(backend: &SharedBackend) -> anyhow::Result<()> {
    let repo = ShipmentRepository::new(backend.clone());
    let existing: HashSet<String> = repo
        .list(&ShipmentFilter::default(), None)
        .await?
        .into_iter()
        .map(|s| s.shipment_id)
        .collect();

    let seeds = [
        ("OS-2025-089", ShipmentType::Incoming, "Shanghai, CN", "San Jose, CA", "2025-08-10", WorkStatus::InProgress, 150),
        ("OS-2025-090", ShipmentType::Outgoing, "San Jose, CA", "New York, NY", "2025-08-12", WorkStatus::Pending, 75),
    ];
    for (code, kind, origin, destination, arrival, status, units) in seeds {
        if existing.contains(code) {
            println!("  {code} already exists, skipping...");
            continue;
        }
        repo.create(NewShipment {
            shipment_id: code.to_string(),
            shipment_type: kind,
            origin: Some(origin.to_string()),
            destination: Some(destination.to_string()),
            carrier: None,
            tracking_number: None,
            serial_start: None,
            serial_end: None,
            total_units: units,
            weight_kg: None,
            estimated_arrival: Some(instant(arrival)?),
            status,
            notes: None,
        })
        .await?;
        println!("  Created {code}");
    }
    Ok(())
}

async fn seed_budget(backend: &SharedBackend) -> anyhow::Result<()> {
    let repo = BudgetRepository::new(backend.clone());
    let week_start = date(BUDGET_WEEK)?;
    let week_end = week_start + chrono::Days::new(6);

    let filter = BudgetFilter {
        week_start: Some(week_start),
        ..BudgetFilter::default()
    };
    let existing: HashSet<String> = repo
        .list(&filter, None)
        .await?
        .into_iter()
        .map(|e| e.category)
        .collect();

    let seeds: [(&str, Decimal, Decimal, &str); 3] = [
        ("Parts & Components", dec!(50000), dec!(32450.75), "Weekly parts procurement budget"),
        ("Labor Costs", dec!(25000), dec!(18250.50), "Technician labor costs"),
        ("Shipping & Logistics", dec!(15000), dec!(12100.25), "Inbound and outbound shipping"),
    ];
    for (category, budgeted, actual, description) in seeds {
        if existing.contains(category) {
            println!("  {category} already exists, skipping...");
            continue;
        }
        repo.create(NewBudgetEntry {
            week_start,
            week_end,
            category: category.to_string(),
            budgeted_amount: budgeted,
            actual_amount: Some(actual),
            description: Some(description.to_string()),
        })
        .await?;
        println!("  Created {category}");
    }
    Ok(())
}
