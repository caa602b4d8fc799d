use super::agenda::{Agenda, AgendaDay};
use super::dates::to_french;
use super::formatter::{ellipsize, join_names, or_not_provided};
use super::meals::{MealCounts, MealTally, PresenceSummaryRow};
use crate::db::contacts::Contact;
use crate::db::daily_life::{PresenceRow, ProfessionalMealRow};
use crate::db::events::AgendaEvent;
use crate::db::projets::ProjetItem;
use crate::db::reports::ReportItem;
use crate::db::services::Service;
use crate::db::tasks::TaskItem;
use crate::db::tasks_hebdo::WeeklyTask;
use crate::db::transmissions::TransmissionItem;
use crate::db::trips::TripItem;
use crate::db::users::User;
use crate::db::vehicles::Vehicle;
use crate::db::youngs::YoungSummary;
use anyhow::Result;
use chrono::NaiveDate;
use prettytable::{row, Table};
use std::collections::BTreeMap;

const CELL_WIDTH: usize = 60;

pub struct View {}

impl View {
    /// Label/value pairs, one per line.
    pub fn details(fields: &[(&str, String)]) -> Result<()> {
        let mut table = Table::new();
        for (label, value) in fields {
            table.add_row(row![b -> label, value]);
        }
        table.printstd();
        Ok(())
    }

    pub fn services(services: &[Service]) -> Result<()> {
        let mut table = Table::new();
        table.add_row(row!["ID", "SERVICE", "ADRESSE", "TÉLÉPHONE"]);
        for service in services {
            table.add_row(row![
                service.id.unwrap_or(0),
                service.name,
                or_not_provided(service.address.as_deref()),
                or_not_provided(service.phone.as_deref())
            ]);
        }
        table.printstd();
        Ok(())
    }

    pub fn users(users: &[User]) -> Result<()> {
        let mut table = Table::new();
        table.add_row(row!["ID", "NOM", "PRÉNOM", "IDENTIFIANT", "NIVEAU", "SERVICE", "EMAIL"]);
        for user in users {
            table.add_row(row![
                user.id.unwrap_or(0),
                user.last_name,
                user.first_name,
                user.login,
                user.level,
                user.service_name.as_deref().unwrap_or("N/A"),
                or_not_provided(user.email.as_deref())
            ]);
        }
        table.printstd();
        Ok(())
    }

    pub fn youngs(youngs: &[YoungSummary]) -> Result<()> {
        let mut table = Table::new();
        table.add_row(row!["ID", "NOM", "PRÉNOM", "NAISSANCE", "STATUT", "RÉFÉRENT", "SERVICE"]);
        for young in youngs {
            table.add_row(row![
                young.id,
                young.last_name,
                young.first_name,
                young.birth_date.map(|d| to_french(&d)).unwrap_or_default(),
                young.admission_status,
                or_not_provided(young.referent_name.as_deref()),
                or_not_provided(young.service_name.as_deref())
            ]);
        }
        table.printstd();
        Ok(())
    }

    pub fn contacts(contacts: &[Contact]) -> Result<()> {
        let mut table = Table::new();
        table.add_row(row!["ID", "NOM", "PRÉNOM", "LIEN", "TÉLÉPHONE", "EMAIL"]);
        for contact in contacts {
            table.add_row(row![
                contact.id.unwrap_or(0),
                contact.last_name,
                or_not_provided(contact.first_name.as_deref()),
                or_not_provided(contact.relationship.as_deref()),
                or_not_provided(contact.phone.as_deref()),
                or_not_provided(contact.email.as_deref())
            ]);
        }
        table.printstd();
        Ok(())
    }

    pub fn events(events: &[AgendaEvent]) -> Result<()> {
        let mut table = Table::new();
        table.add_row(row!["ID", "DÉBUT", "FIN", "ÉVÉNEMENT", "TYPE", "JEUNES"]);
        for item in events {
            let event = &item.event;
            table.add_row(row![
                event.id.unwrap_or(0),
                event.start.format("%d-%m-%Y %H:%M"),
                event.end.format("%d-%m-%Y %H:%M"),
                event.name,
                event.event_type.map(|t| t.to_string()).unwrap_or_default(),
                join_names(&item.young_names, "")
            ]);
        }
        table.printstd();
        Ok(())
    }

    pub fn agenda(agenda: &Agenda) -> Result<()> {
        let mut table = Table::new();
        table.add_row(row!["JOUR", "TÂCHES HEBDO", "ÉVÉNEMENTS"]);
        for day in &agenda.days {
            table.add_row(Self::agenda_row(day));
        }
        table.printstd();
        Ok(())
    }

    pub fn agenda_day(day: &AgendaDay) -> Result<()> {
        let mut table = Table::new();
        table.add_row(row!["JOUR", "TÂCHES HEBDO", "ÉVÉNEMENTS"]);
        table.add_row(Self::agenda_row(day));
        table.printstd();
        Ok(())
    }

    fn agenda_row(day: &AgendaDay) -> prettytable::Row {
        let weekly = day
            .weekly_tasks
            .iter()
            .map(|t| format!("• {}", t.description))
            .collect::<Vec<_>>()
            .join("\n");
        let events = day
            .events
            .iter()
            .map(|e| {
                let names = join_names(&e.young_names, "");
                if names.is_empty() {
                    format!("{} {}", e.event.start.format("%H:%M"), e.event.name)
                } else {
                    format!("{} {} ({})", e.event.start.format("%H:%M"), e.event.name, names)
                }
            })
            .collect::<Vec<_>>()
            .join("\n");
        row![format!("{} {}", day.weekday, to_french(&day.date)), weekly, events]
    }

    pub fn tasks(tasks: &[TaskItem]) -> Result<()> {
        let mut table = Table::new();
        table.add_row(row!["ID", "ÉCHÉANCE", "STATUT", "DESCRIPTION", "ATTRIBUÉE À", "JEUNES"]);
        for item in tasks {
            table.add_row(row![
                item.task.id.unwrap_or(0),
                item.task.due_date.map(|d| to_french(&d)).unwrap_or_default(),
                item.status,
                ellipsize(&item.task.description, CELL_WIDTH),
                item.assignee,
                join_names(&item.young_names, "")
            ]);
        }
        table.printstd();
        Ok(())
    }

    pub fn weekly_tasks(tasks: &[WeeklyTask]) -> Result<()> {
        let mut table = Table::new();
        table.add_row(row!["ID", "JOUR", "TÂCHE", "SERVICE"]);
        for task in tasks {
            table.add_row(row![
                task.id.unwrap_or(0),
                task.day,
                task.description,
                task.service_name.as_deref().unwrap_or("")
            ]);
        }
        table.printstd();
        Ok(())
    }

    pub fn transmissions(transmissions: &[TransmissionItem]) -> Result<()> {
        let mut table = Table::new();
        table.add_row(row!["ID", "DATE", "AUTEUR", "SERVICE", "CATÉGORIE", "IMPORTANCE", "CONCERNE", "CONTENU"]);
        for item in transmissions {
            let t = &item.transmission;
            table.add_row(row![
                t.id.unwrap_or(0),
                t.written_at.format("%d-%m-%Y %H:%M"),
                item.author_name,
                item.service_name,
                t.category.map(|c| c.to_string()).unwrap_or_default(),
                t.importance,
                item.concerned(),
                ellipsize(&t.content, CELL_WIDTH)
            ]);
        }
        table.printstd();
        Ok(())
    }

    pub fn reports(reports: &[ReportItem]) -> Result<()> {
        let mut table = Table::new();
        table.add_row(row!["ID", "DATE", "TYPE", "JEUNE", "RÉDACTEUR", "STATUT"]);
        for report in reports {
            table.add_row(row![
                report.id,
                report.written_on.map(|d| to_french(&d)).unwrap_or_default(),
                report.report_type,
                report.young_name,
                report.author_name,
                report.status
            ]);
        }
        table.printstd();
        Ok(())
    }

    pub fn projets(projets: &[ProjetItem]) -> Result<()> {
        let mut table = Table::new();
        table.add_row(row!["ID", "DATE", "JEUNE"]);
        for projet in projets {
            table.add_row(row![projet.id, to_french(&projet.date), projet.young_name]);
        }
        table.printstd();
        Ok(())
    }

    pub fn vehicles(vehicles: &[Vehicle]) -> Result<()> {
        let mut table = Table::new();
        table.add_row(row!["ID", "MARQUE", "MODÈLE", "PLAQUE", "PLACES", "CV"]);
        for vehicle in vehicles {
            table.add_row(row![
                vehicle.id.unwrap_or(0),
                vehicle.brand,
                vehicle.model,
                vehicle.plate,
                vehicle.seats.map(|s| s.to_string()).unwrap_or_default(),
                vehicle.fiscal_power.map(|p| p.to_string()).unwrap_or_default()
            ]);
        }
        table.printstd();
        Ok(())
    }

    pub fn trips(trips: &[TripItem]) -> Result<()> {
        let mut table = Table::new();
        table.add_row(row!["ID", "DATE", "DÉPART", "RETOUR", "CONDUCTEUR", "VÉHICULE", "SERVICE", "JEUNES", "KM"]);
        for item in trips {
            let trip = &item.trip;
            table.add_row(row![
                trip.id.unwrap_or(0),
                to_french(&trip.date),
                trip.departure.format("%H:%M"),
                trip.return_time.map(|t| t.format("%H:%M").to_string()).unwrap_or_default(),
                item.driver_name,
                item.vehicle_label,
                item.service_name,
                item.passengers(),
                trip.distance().map(|d| d.to_string()).unwrap_or_default()
            ]);
        }
        table.printstd();
        Ok(())
    }

    pub fn presence(rows: &[PresenceRow]) -> Result<()> {
        let mut table = Table::new();
        table.add_row(row!["ID", "JEUNE", "PRÉSENCE", "MIDI", "SOIR", ""]);
        for line in rows {
            table.add_row(row![
                line.entry.young_id,
                line.name,
                line.entry.status,
                line.entry.lunch,
                line.entry.dinner,
                if line.recorded { "" } else { "par défaut" }
            ]);
        }
        table.printstd();
        Ok(())
    }

    pub fn professional_meals(rows: &[ProfessionalMealRow]) -> Result<()> {
        let mut table = Table::new();
        table.add_row(row!["ID", "PROFESSIONNEL", "MIDI", "SOIR"]);
        for line in rows {
            table.add_row(row![line.entry.user_id, line.name, line.entry.lunch, line.entry.dinner]);
        }
        table.printstd();
        Ok(())
    }

    pub fn meal_counts(counts: &MealCounts) -> Result<()> {
        let mut table = Table::new();
        table.add_row(row!["", "REPAS", "NORMAL", "SANS PORC", "VÉGÉTARIEN", "TOTAL"]);
        let rows: [(&str, &str, &MealTally); 4] = [
            ("Jeunes", "Midi", &counts.youngs.lunch),
            ("Jeunes", "Soir", &counts.youngs.dinner),
            ("Professionnels", "Midi", &counts.professionals.lunch),
            ("Professionnels", "Soir", &counts.professionals.dinner),
        ];
        for (who, moment, tally) in rows {
            table.add_row(row![who, moment, tally.normal, tally.no_pork, tally.vegetarian, b -> tally.total]);
        }
        table.add_row(row![b -> "Total", "Midi", "", "", "", b -> counts.lunch_total()]);
        table.add_row(row![b -> "Total", "Soir", "", "", "", b -> counts.dinner_total()]);
        table.printstd();
        Ok(())
    }

    pub fn weekly_meals(summary: &BTreeMap<NaiveDate, MealCounts>) -> Result<()> {
        let mut table = Table::new();
        table.add_row(row!["DATE", "JEUNES MIDI", "JEUNES SOIR", "PROS MIDI", "PROS SOIR", "TOTAL"]);
        for (date, counts) in summary {
            table.add_row(row![
                to_french(date),
                counts.youngs.lunch.total,
                counts.youngs.dinner.total,
                counts.professionals.lunch.total,
                counts.professionals.dinner.total,
                counts.lunch_total() + counts.dinner_total()
            ]);
        }
        table.printstd();
        Ok(())
    }

    pub fn presence_summary(rows: &[PresenceSummaryRow]) -> Result<()> {
        let mut table = Table::new();
        table.add_row(row!["JEUNE", "PRÉSENT", "ABSENT", "PERMIS FAMILLE", "FUGUE", "HÔPITAL"]);
        for line in rows {
            table.add_row(row![line.name, line.present, line.absent, line.family_leave, line.runaway, line.hospital]);
        }
        table.printstd();
        Ok(())
    }

    pub fn migrations(history: &[(u32, String, String)]) -> Result<()> {
        let mut table = Table::new();
        table.add_row(row!["VERSION", "NAME", "APPLIED AT"]);
        for (version, name, applied_at) in history {
            table.add_row(row![version, name, applied_at]);
        }
        table.printstd();
        Ok(())
    }
}
