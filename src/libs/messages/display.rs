//! French text of every user-facing message.
//!
//! Dates are printed the way staff write them (`JJ-MM-AAAA`).

use super::types::Message;
use crate::libs::dates::to_french;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === SESSION MESSAGES ===
            Message::LoginRequired => "Vous devez vous connecter : mecs login".to_string(),
            Message::AdminRequired => "Cette action est réservée à la gestion administrative".to_string(),
            Message::PromptLogin => "Identifiant".to_string(),
            Message::PromptPassword => "Mot de passe".to_string(),
            Message::PromptNewPassword => "Nouveau mot de passe (vide pour conserver l'actuel)".to_string(),
            Message::PromptPasswordConfirm => "Confirmez le mot de passe".to_string(),
            Message::PasswordMismatch => "Les mots de passe ne correspondent pas".to_string(),
            Message::LoginFailed => "Identifiant ou mot de passe incorrect".to_string(),
            Message::LoggedIn(login, level) => format!("Connecté en tant que {} ({})", login, level),
            Message::LoggedOut => "Déconnexion effectuée".to_string(),
            Message::NotLoggedIn => "Aucun utilisateur connecté".to_string(),
            Message::NoServiceAssigned => "Aucun service n'est associé à votre compte".to_string(),

            // === SETUP MESSAGES ===
            Message::DatabaseReady(path) => format!("Base de données prête : {}", path),
            Message::DefaultAdminCreated(login) => format!("Compte administrateur créé : {}", login),
            Message::ChangeDefaultPassword(password) => {
                format!("Le mot de passe par défaut est « {} », changez-le dès que possible", password)
            }
            Message::UsersAlreadyPresent => "Des comptes existent déjà, aucun administrateur créé".to_string(),
            Message::SettingsHeader => "Paramètres".to_string(),
            Message::SettingsSaved(path) => format!("Paramètres enregistrés dans {}", path),
            Message::PromptAppearanceMode => "Mode d'apparence".to_string(),
            Message::PromptColorTheme => "Thème de couleur".to_string(),
            Message::PromptDatabasePath => "Chemin de la base de données (vide pour l'emplacement par défaut)".to_string(),

            // === GENERIC MESSAGES ===
            Message::NoneChoice => "(aucun)".to_string(),
            Message::NoChangesDetected => "Aucune modification".to_string(),
            Message::OperationCancelled => "Opération annulée".to_string(),
            Message::OperationFailed => "L'opération a échoué, consultez le journal pour le détail".to_string(),
            Message::RecordNotFound(entity, id) => format!("Enregistrement introuvable : {} #{}", entity, id),
            Message::RecordInUse(entity) => format!("Suppression impossible : {} est encore référencé", entity),
            Message::DuplicateRecord(column) => format!("Cette valeur existe déjà ({})", column),
            Message::MissingReference => "Un enregistrement lié est introuvable".to_string(),
            Message::InvalidValue(field, value) => format!("Valeur invalide pour {} : {}", field, value),
            Message::PromptLastName => "Nom".to_string(),
            Message::PromptFirstName => "Prénom".to_string(),
            Message::PromptAddress => "Adresse".to_string(),
            Message::PromptPhone => "Téléphone".to_string(),
            Message::PromptEmail => "Email".to_string(),
            Message::SelectService => "Service".to_string(),
            Message::SelectConcernedYoungs => "Jeunes concernés (espace pour cocher)".to_string(),

            // === SERVICE MESSAGES ===
            Message::ServicesHeader => "Services".to_string(),
            Message::NoServicesFound => "Aucun service".to_string(),
            Message::SelectServiceToDelete => "Service à supprimer".to_string(),
            Message::ServiceStaffHeader(name) => format!("Équipe du service {}", name),
            Message::PromptServiceName => "Nom du service".to_string(),
            Message::ServiceCreated(name) => format!("Service « {} » créé", name),
            Message::ServiceUpdated(name) => format!("Service « {} » mis à jour", name),
            Message::ServiceDeleted(name) => format!("Service « {} » supprimé", name),
            Message::ConfirmDeleteService(name) => format!("Supprimer le service « {} » ?", name),
            Message::DuplicateServiceName => "Un service porte déjà ce nom".to_string(),

            // === USER MESSAGES ===
            Message::UsersHeader => "Professionnels".to_string(),
            Message::NoUsersFound => "Aucun professionnel".to_string(),
            Message::SelectUser => "Professionnel".to_string(),
            Message::SelectUserToDelete => "Professionnel à supprimer".to_string(),
            Message::SelectPermissionLevel => "Niveau d'autorisation".to_string(),
            Message::UserCreated(name, login) => format!("Compte de {} créé (identifiant {})", name, login),
            Message::UserUpdated(name) => format!("Compte de {} mis à jour", name),
            Message::UserDeleted(name) => format!("Compte de {} supprimé", name),
            Message::ConfirmDeleteUser(name) => format!("Supprimer le compte de {} ?", name),
            Message::DuplicateLogin => "Cet identifiant est déjà utilisé".to_string(),
            Message::DuplicateEmail => "Cette adresse email est déjà utilisée".to_string(),

            // === YOUNG MESSAGES ===
            Message::YoungsHeader => "Jeunes accueillis".to_string(),
            Message::NoYoungsFound => "Aucun jeune".to_string(),
            Message::SelectYoung => "Jeune".to_string(),
            Message::SelectYoungToDelete => "Jeune à supprimer".to_string(),
            Message::PromptBirthDate => "Date de naissance".to_string(),
            Message::PromptBirthPlace => "Lieu de naissance".to_string(),
            Message::PromptEntryDate => "Date d'entrée".to_string(),
            Message::PromptPlacementEndDate => "Date d'échéance du placement".to_string(),
            Message::PromptHearingDate => "Date d'audience".to_string(),
            Message::PromptCareSynthesisDate => "Date de synthèse PEC".to_string(),
            Message::PromptContractEndDate => "Date d'échéance du CJM".to_string(),
            Message::PromptExitDate => "Date de sortie".to_string(),
            Message::SelectPlacementType => "Type de placement".to_string(),
            Message::SelectAccompanimentType => "Type d'accompagnement".to_string(),
            Message::SelectAdmissionStatus => "Statut d'accueil".to_string(),
            Message::SelectReferent => "Référent".to_string(),
            Message::SelectCoReferent => "Co-référent".to_string(),
            Message::YoungCreated(name) => format!("Dossier de {} créé", name),
            Message::YoungUpdated(name) => format!("Dossier de {} mis à jour", name),
            Message::YoungDeleted(name) => format!("Dossier de {} supprimé", name),
            Message::ConfirmDeleteYoung(name) => {
                format!("Supprimer le dossier de {} ainsi que ses contacts et liens ?", name)
            }

            // === CONTACT MESSAGES ===
            Message::ContactsHeader(name) => format!("Contacts de {}", name),
            Message::NoContactsFound => "Aucun contact".to_string(),
            Message::PromptRelationship => "Lien de parenté".to_string(),
            Message::ContactCreated(contact, young) => format!("Contact {} ajouté pour {}", contact, young),
            Message::ContactUpdated(contact) => format!("Contact {} mis à jour", contact),
            Message::ContactDeleted(contact) => format!("Contact {} supprimé", contact),
            Message::ConfirmDeleteContact(contact) => format!("Supprimer le contact {} ?", contact),

            // === AGENDA MESSAGES ===
            Message::EventsHeader(start, end) => format!("Événements du {} au {}", to_french(start), to_french(end)),
            Message::YoungEventsHeader(name) => format!("Événements concernant {}", name),
            Message::NoEventsFound => "Aucun événement".to_string(),
            Message::PromptEventName => "Intitulé".to_string(),
            Message::PromptEventStart => "Début (AAAA-MM-JJ HH:MM)".to_string(),
            Message::PromptEventEnd => "Fin (AAAA-MM-JJ HH:MM)".to_string(),
            Message::SelectEventType => "Type d'événement".to_string(),
            Message::SelectResponsible => "Professionnel responsable".to_string(),
            Message::EventCreated(name) => format!("Événement « {} » créé", name),
            Message::EventUpdated(name) => format!("Événement « {} » mis à jour", name),
            Message::EventDeleted(name) => format!("Événement « {} » supprimé", name),
            Message::ConfirmDeleteEvent(name) => format!("Supprimer l'événement « {} » ?", name),
            Message::AgendaWeekHeader(start, end) => {
                format!("Agenda de la semaine du {} au {}", to_french(start), to_french(end))
            }
            Message::AgendaDayHeader(date) => format!("Agenda du {}", to_french(date)),
            Message::AgendaDayEmpty(date) => format!("Rien de prévu le {}", to_french(date)),

            // === TASK MESSAGES ===
            Message::TasksHeader => "Tâches".to_string(),
            Message::UrgentTasksHeader => "Tâches urgentes".to_string(),
            Message::NoTasksFound => "Aucune tâche".to_string(),
            Message::PromptTaskDescription => "Tâche à réaliser".to_string(),
            Message::PromptDueDate => "Date limite (vide si aucune)".to_string(),
            Message::SelectAssignee => "Attribuée à".to_string(),
            Message::TaskCreated(description) => format!("Tâche « {} » créée", description),
            Message::TaskUpdated(id) => format!("Tâche #{} mise à jour", id),
            Message::TaskCompleted(id) => format!("Tâche #{} réalisée", id),
            Message::TaskReopened(id) => format!("Tâche #{} de nouveau à faire", id),
            Message::TaskDeleted(id) => format!("Tâche #{} supprimée", id),
            Message::ConfirmDeleteTask(description) => format!("Supprimer la tâche « {} » ?", description),
            Message::WeeklyTasksHeader => "Tâches hebdomadaires".to_string(),
            Message::NoWeeklyTasksFound => "Aucune tâche hebdomadaire".to_string(),
            Message::SelectWeekday => "Jour de la semaine".to_string(),
            Message::WeeklyTaskCreated(day) => format!("Tâche hebdomadaire ajoutée le {}", day),
            Message::WeeklyTaskUpdated(id) => format!("Tâche hebdomadaire #{} mise à jour", id),
            Message::WeeklyTaskDeleted(id) => format!("Tâche hebdomadaire #{} supprimée", id),
            Message::ConfirmDeleteWeeklyTask(description) => {
                format!("Supprimer la tâche hebdomadaire « {} » ?", description)
            }

            // === TRANSMISSION MESSAGES ===
            Message::TransmissionsHeader(start, end) => {
                format!("Transmissions du {} au {}", to_french(start), to_french(end))
            }
            Message::YoungTransmissionsHeader(name) => format!("Transmissions concernant {}", name),
            Message::LatestTransmissionsHeader => "Dernières transmissions".to_string(),
            Message::NoTransmissionsFound => "Aucune transmission".to_string(),
            Message::PromptTransmissionContent => "Contenu".to_string(),
            Message::SelectTransmissionCategory => "Catégorie".to_string(),
            Message::SelectImportance => "Importance".to_string(),
            Message::TransmissionCreated => "Transmission enregistrée".to_string(),
            Message::TransmissionUpdated(id) => format!("Transmission #{} mise à jour", id),
            Message::TransmissionDeleted(id) => format!("Transmission #{} supprimée", id),
            Message::ConfirmDeleteTransmission(id) => format!("Supprimer la transmission #{} ?", id),

            // === REPORT MESSAGES ===
            Message::ReportsHeader => "Rapports".to_string(),
            Message::NoReportsFound => "Aucun rapport".to_string(),
            Message::SelectReportType => "Type de rapport".to_string(),
            Message::PromptSection(title) => title.clone(),
            Message::ReportCreated(id, name) => format!("Rapport #{} créé pour {}", id, name),
            Message::ReportUpdated(id) => format!("Rapport #{} mis à jour", id),
            Message::ReportValidated(id, login) => format!("Rapport #{} validé par {}", id, login),
            Message::ReportAlreadyValidated(id) => format!("Le rapport #{} est déjà validé", id),
            Message::ReportNotValidated(id) => {
                format!("Le rapport #{} n'est pas validé, seul un rapport validé peut être exporté", id)
            }
            Message::EditingValidatedReport(id) => format!("Le rapport #{} est déjà validé", id),
            Message::ReportDeleted(id) => format!("Rapport #{} supprimé", id),
            Message::ConfirmDeleteReport(id) => format!("Supprimer le rapport #{} ?", id),

            // === PROJECT MESSAGES ===
            Message::ProjetsHeader => "Projets personnalisés".to_string(),
            Message::NoProjetsFound => "Aucun projet personnalisé".to_string(),
            Message::NoProjetForYoung(name) => format!("{} n'a pas encore de projet personnalisé", name),
            Message::PromptProjetDate => "Date du projet".to_string(),
            Message::PromptObjective(index) => format!("Objectif {} (vide pour terminer)", index),
            Message::PromptMean(index) => format!("  Moyen {} (vide pour terminer)", index),
            Message::PromptEvaluation => "  Évaluation".to_string(),
            Message::SelectObjectiveCategory => "  Catégorie".to_string(),
            Message::ConfirmKeepObjectives(count) => format!("Conserver les {} objectifs existants ?", count),
            Message::ProjetSaved(id, name) => format!("Projet #{} enregistré pour {}", id, name),
            Message::ProjetDeleted(name) => format!("Projet de {} supprimé", name),
            Message::ConfirmDeleteProjet(name) => format!("Supprimer le projet de {} ?", name),
            Message::DuplicateProjet => "Ce jeune a déjà un projet personnalisé".to_string(),

            // === VEHICLE MESSAGES ===
            Message::VehiclesHeader => "Véhicules".to_string(),
            Message::NoVehiclesFound => "Aucun véhicule".to_string(),
            Message::SelectVehicle => "Véhicule".to_string(),
            Message::SelectVehicleToDelete => "Véhicule à supprimer".to_string(),
            Message::PromptBrand => "Marque".to_string(),
            Message::PromptModel => "Modèle".to_string(),
            Message::PromptPlate => "Plaque d'immatriculation".to_string(),
            Message::PromptSeats => "Nombre de places".to_string(),
            Message::PromptFiscalPower => "Puissance fiscale".to_string(),
            Message::VehicleCreated(label) => format!("Véhicule {} ajouté", label),
            Message::VehicleUpdated(label) => format!("Véhicule {} mis à jour", label),
            Message::VehicleDeleted(label) => format!("Véhicule {} supprimé", label),
            Message::ConfirmDeleteVehicle(label) => format!("Supprimer le véhicule {} ?", label),
            Message::DuplicatePlate => "Cette plaque d'immatriculation est déjà enregistrée".to_string(),
            Message::VehicleInUse => "Ce véhicule est utilisé par des trajets et ne peut pas être supprimé".to_string(),

            // === TRIP MESSAGES ===
            Message::TripsHeader => "Trajets".to_string(),
            Message::NoTripsFound => "Aucun trajet".to_string(),
            Message::PromptTripDate => "Date du trajet".to_string(),
            Message::PromptDepartureTime => "Heure de départ (HH:MM)".to_string(),
            Message::PromptReturnTime => "Heure de retour (HH:MM)".to_string(),
            Message::PromptPurpose => "Motif".to_string(),
            Message::PromptKmStart => "Kilométrage au départ".to_string(),
            Message::PromptKmEnd => "Kilométrage au retour".to_string(),
            Message::SelectDriver => "Conducteur".to_string(),
            Message::SelectPassengers => "Jeunes transportés".to_string(),
            Message::TripCreated(id) => format!("Trajet #{} enregistré", id),
            Message::TripUpdated(id) => format!("Trajet #{} mis à jour", id),
            Message::TripDeleted(id) => format!("Trajet #{} supprimé", id),
            Message::ConfirmDeleteTrip(id) => format!("Supprimer le trajet #{} ?", id),

            // === DAILY LIFE MESSAGES ===
            Message::PresenceHeader(date) => format!("Présences du {}", to_french(date)),
            Message::PresenceSummaryHeader(start, end) => {
                format!("Bilan des présences du {} au {}", to_french(start), to_french(end))
            }
            Message::SelectPresenceStatus(name) => format!("Présence de {}", name),
            Message::SelectLunch => "  Repas du midi".to_string(),
            Message::SelectDinner => "  Repas du soir".to_string(),
            Message::PresenceSaved(date, count) => {
                format!("{} présence(s) enregistrée(s) pour le {}", count, to_french(date))
            }
            Message::StaffMealsHeader(date) => format!("Repas des professionnels du {}", to_french(date)),
            Message::StaffMealsFor(name) => format!("Repas de {}", name),
            Message::StaffMealsSaved(date, count) => {
                format!("{} choix de repas enregistré(s) pour le {}", count, to_french(date))
            }
            Message::MealCountsHeader(date) => format!("Effectifs repas du {}", to_french(date)),
            Message::WeeklyMealsHeader(start, end) => {
                format!("Effectifs repas du {} au {}", to_french(start), to_french(end))
            }

            // === DASHBOARD MESSAGES ===
            Message::DashboardHeader(date, login) => format!("Tableau de bord du {} ({})", to_french(date), login),
            Message::DashboardEmpty => "Rien à signaler aujourd'hui".to_string(),
            Message::TodayEventsHeader => "Événements du jour".to_string(),

            // === EXPORT MESSAGES ===
            Message::ExportCompleted(path) => format!("Export terminé : {}", path),
            Message::ExportFormatUnsupported(format) => format!("Le format {} n'est pas disponible pour cet export", format),

            // === MIGRATION MESSAGES ===
            Message::MigrationsFound(count) => format!("{} migration(s) en attente", count),
            Message::RunningMigration(version, name) => format!("Migration v{} : {}", version, name),
            Message::MigrationFailed(version, error) => format!("Échec de la migration v{} : {}", version, error),
            Message::AllMigrationsCompleted => "Schéma de la base mis à jour".to_string(),
            Message::DatabaseVersion(current, latest) => {
                format!("Version du schéma : {} (dernière : {})", current, latest)
            }
            Message::DatabaseUpToDate => "Le schéma de la base est à jour".to_string(),
            Message::DatabaseNeedsUpdate => "Le schéma de la base doit être mis à jour".to_string(),
            Message::MigrationHistory => "Historique des migrations".to_string(),
            Message::NoMigrationsApplied => "Aucune migration appliquée".to_string(),
        };

        write!(f, "{}", text)
    }
}
