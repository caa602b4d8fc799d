use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub enum Message {
    // === SESSION MESSAGES ===
    LoginRequired,
    AdminRequired,
    PromptLogin,
    PromptPassword,
    PromptNewPassword,
    PromptPasswordConfirm,
    PasswordMismatch,
    LoginFailed,
    LoggedIn(String, String), // login, permission level
    LoggedOut,
    NotLoggedIn,
    NoServiceAssigned,

    // === SETUP MESSAGES ===
    DatabaseReady(String), // path
    DefaultAdminCreated(String),
    ChangeDefaultPassword(String),
    UsersAlreadyPresent,
    SettingsHeader,
    SettingsSaved(String), // path
    PromptAppearanceMode,
    PromptColorTheme,
    PromptDatabasePath,

    // === GENERIC MESSAGES ===
    NoneChoice,
    NoChangesDetected,
    OperationCancelled,
    OperationFailed,
    RecordNotFound(String, i64), // entity, id
    RecordInUse(String),         // entity
    DuplicateRecord(String),     // table.column
    MissingReference,
    InvalidValue(String, String), // field, value
    PromptLastName,
    PromptFirstName,
    PromptAddress,
    PromptPhone,
    PromptEmail,
    SelectService,
    SelectConcernedYoungs,

    // === SERVICE MESSAGES ===
    ServicesHeader,
    NoServicesFound,
    SelectServiceToDelete,
    ServiceStaffHeader(String),
    PromptServiceName,
    ServiceCreated(String),
    ServiceUpdated(String),
    ServiceDeleted(String),
    ConfirmDeleteService(String),
    DuplicateServiceName,

    // === USER MESSAGES ===
    UsersHeader,
    NoUsersFound,
    SelectUser,
    SelectUserToDelete,
    SelectPermissionLevel,
    UserCreated(String, String), // name, login
    UserUpdated(String),
    UserDeleted(String),
    ConfirmDeleteUser(String),
    DuplicateLogin,
    DuplicateEmail,

    // === YOUNG MESSAGES ===
    YoungsHeader,
    NoYoungsFound,
    SelectYoung,
    SelectYoungToDelete,
    PromptBirthDate,
    PromptBirthPlace,
    PromptEntryDate,
    PromptPlacementEndDate,
    PromptHearingDate,
    PromptCareSynthesisDate,
    PromptContractEndDate,
    PromptExitDate,
    SelectPlacementType,
    SelectAccompanimentType,
    SelectAdmissionStatus,
    SelectReferent,
    SelectCoReferent,
    YoungCreated(String),
    YoungUpdated(String),
    YoungDeleted(String),
    ConfirmDeleteYoung(String),

    // === CONTACT MESSAGES ===
    ContactsHeader(String), // young name
    NoContactsFound,
    PromptRelationship,
    ContactCreated(String, String), // contact, young
    ContactUpdated(String),
    ContactDeleted(String),
    ConfirmDeleteContact(String),

    // === AGENDA MESSAGES ===
    EventsHeader(NaiveDate, NaiveDate),
    YoungEventsHeader(String),
    NoEventsFound,
    PromptEventName,
    PromptEventStart,
    PromptEventEnd,
    SelectEventType,
    SelectResponsible,
    EventCreated(String),
    EventUpdated(String),
    EventDeleted(String),
    ConfirmDeleteEvent(String),
    AgendaWeekHeader(NaiveDate, NaiveDate),
    AgendaDayHeader(NaiveDate),
    AgendaDayEmpty(NaiveDate),

    // === TASK MESSAGES ===
    TasksHeader,
    UrgentTasksHeader,
    NoTasksFound,
    PromptTaskDescription,
    PromptDueDate,
    SelectAssignee,
    TaskCreated(String),
    TaskUpdated(i64),
    TaskCompleted(i64),
    TaskReopened(i64),
    TaskDeleted(i64),
    ConfirmDeleteTask(String),
    WeeklyTasksHeader,
    NoWeeklyTasksFound,
    SelectWeekday,
    WeeklyTaskCreated(String), // weekday
    WeeklyTaskUpdated(i64),
    WeeklyTaskDeleted(i64),
    ConfirmDeleteWeeklyTask(String),

    // === TRANSMISSION MESSAGES ===
    TransmissionsHeader(NaiveDate, NaiveDate),
    YoungTransmissionsHeader(String),
    LatestTransmissionsHeader,
    NoTransmissionsFound,
    PromptTransmissionContent,
    SelectTransmissionCategory,
    SelectImportance,
    TransmissionCreated,
    TransmissionUpdated(i64),
    TransmissionDeleted(i64),
    ConfirmDeleteTransmission(i64),

    // === REPORT MESSAGES ===
    ReportsHeader,
    NoReportsFound,
    SelectReportType,
    PromptSection(String), // section title
    ReportCreated(i64, String),
    ReportUpdated(i64),
    ReportValidated(i64, String), // id, validator login
    ReportAlreadyValidated(i64),
    ReportNotValidated(i64),
    EditingValidatedReport(i64),
    ReportDeleted(i64),
    ConfirmDeleteReport(i64),

    // === PROJECT MESSAGES ===
    ProjetsHeader,
    NoProjetsFound,
    NoProjetForYoung(String),
    PromptProjetDate,
    PromptObjective(usize),
    PromptMean(usize),
    PromptEvaluation,
    SelectObjectiveCategory,
    ConfirmKeepObjectives(usize),
    ProjetSaved(i64, String),
    ProjetDeleted(String),
    ConfirmDeleteProjet(String),
    DuplicateProjet,

    // === VEHICLE MESSAGES ===
    VehiclesHeader,
    NoVehiclesFound,
    SelectVehicle,
    SelectVehicleToDelete,
    PromptBrand,
    PromptModel,
    PromptPlate,
    PromptSeats,
    PromptFiscalPower,
    VehicleCreated(String),
    VehicleUpdated(String),
    VehicleDeleted(String),
    ConfirmDeleteVehicle(String),
    DuplicatePlate,
    VehicleInUse,

    // === TRIP MESSAGES ===
    TripsHeader,
    NoTripsFound,
    PromptTripDate,
    PromptDepartureTime,
    PromptReturnTime,
    PromptPurpose,
    PromptKmStart,
    PromptKmEnd,
    SelectDriver,
    SelectPassengers,
    TripCreated(i64),
    TripUpdated(i64),
    TripDeleted(i64),
    ConfirmDeleteTrip(i64),

    // === DAILY LIFE MESSAGES ===
    PresenceHeader(NaiveDate),
    PresenceSummaryHeader(NaiveDate, NaiveDate),
    SelectPresenceStatus(String), // young name
    SelectLunch,
    SelectDinner,
    PresenceSaved(NaiveDate, usize),
    StaffMealsHeader(NaiveDate),
    StaffMealsFor(String),
    StaffMealsSaved(NaiveDate, usize),
    MealCountsHeader(NaiveDate),
    WeeklyMealsHeader(NaiveDate, NaiveDate),

    // === DASHBOARD MESSAGES ===
    DashboardHeader(NaiveDate, String),
    DashboardEmpty,
    TodayEventsHeader,

    // === EXPORT MESSAGES ===
    ExportCompleted(String),
    ExportFormatUnsupported(String),

    // === MIGRATION MESSAGES ===
    MigrationsFound(usize),        // count
    RunningMigration(u32, String), // version, name
    MigrationFailed(u32, String),  // version, error
    AllMigrationsCompleted,
    DatabaseVersion(u32, u32), // current, latest
    DatabaseUpToDate,
    DatabaseNeedsUpdate,
    MigrationHistory,
    NoMigrationsApplied,
}
