//! The job attribute catalog.
//!
//! Every logical attribute a job proxy can read (and, for a subset, write)
//! has a stable integer code, lives in exactly one retrieve format, and
//! names the field that carries it in that format's layout. This table is
//! the format dispatcher: `attribute -> format -> host call`.
//!
//! The same code doubles as the wire key in change-job requests.

use serde::{Deserialize, Serialize};

use open_midrange_record::FieldKind;

use crate::format::FormatGroup;

macro_rules! job_attributes {
    ($($(#[$meta:meta])* $variant:ident = $code:literal => ($group:ident, $field:literal, $settable:literal)),+ $(,)?) => {
        /// One logical job attribute.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[repr(u32)]
        pub enum JobAttribute {
            $($(#[$meta])* $variant = $code,)+
        }

        impl JobAttribute {
            /// Every attribute, in code order.
            pub const ALL: &'static [JobAttribute] = &[$(JobAttribute::$variant),+];

            /// The attribute's stable integer code (also the change key).
            pub fn code(self) -> u32 {
                self as u32
            }

            /// Look an attribute up by code.
            pub fn from_code(code: u32) -> Option<JobAttribute> {
                match code {
                    $($code => Some(JobAttribute::$variant),)+
                    _ => None,
                }
            }

            /// The retrieve format that carries this attribute.
            pub fn format(self) -> FormatGroup {
                match self {
                    $(JobAttribute::$variant => FormatGroup::$group,)+
                }
            }

            /// The attribute's field name within its format layout.
            pub fn field_name(self) -> &'static str {
                match self {
                    $(JobAttribute::$variant => $field,)+
                }
            }

            /// Whether the host accepts change requests for this attribute.
            pub fn is_settable(self) -> bool {
                match self {
                    $(JobAttribute::$variant => $settable,)+
                }
            }
        }
    };
}

job_attributes! {
    // --- Identification (reply header, present in every format) ---------
    /// Job name (10 characters).
    JobName = 101 => (Basic, "JOB_NAME", false),
    /// User profile the job runs under.
    UserName = 102 => (Basic, "USER_NAME", false),
    /// System-assigned 6-digit job number.
    JobNumber = 103 => (Basic, "JOB_NUMBER", false),
    /// Opaque 16-byte internal job identifier.
    InternalJobId = 104 => (Basic, "INTERNAL_JOB_ID", false),
    /// Overall status (`*ACTIVE`, `*JOBQ`, `*OUTQ`).
    JobStatus = 105 => (Basic, "JOB_STATUS", false),
    JobType = 106 => (Basic, "JOB_TYPE", false),
    JobSubtype = 107 => (Basic, "JOB_SUBTYPE", false),

    // --- Basic runtime (JOBI0100) ----------------------------------------
    RunPriority = 201 => (Basic, "RUN_PRIORITY", true),
    TimeSlice = 202 => (Basic, "TIME_SLICE", true),
    DefaultWaitTime = 203 => (Basic, "DEFAULT_WAIT_TIME", true),
    /// Processing unit time used, in milliseconds.
    CpuTimeUsed = 204 => (Basic, "CPU_TIME_USED", false),
    SystemPoolId = 205 => (Basic, "SYSTEM_POOL_ID", false),
    MaxCpuTime = 206 => (Basic, "MAX_CPU_TIME", false),
    MaxTempStorage = 207 => (Basic, "MAX_TEMP_STORAGE", false),
    AuxiliaryIoRequests = 208 => (Basic, "AUXILIARY_IO_REQUESTS", false),
    InteractiveTransactions = 209 => (Basic, "INTERACTIVE_TRANSACTIONS", false),
    TotalResponseTime = 210 => (Basic, "TOTAL_RESPONSE_TIME", false),
    JobTypeEnhanced = 211 => (Basic, "JOB_TYPE_ENHANCED", false),
    /// Whether the job is eligible to be moved out of main storage.
    Purge = 212 => (Basic, "PURGE", true),
    TimeSliceEndPool = 213 => (Basic, "TIME_SLICE_END_POOL", true),
    FunctionType = 214 => (Basic, "FUNCTION_TYPE", false),
    FunctionName = 215 => (Basic, "FUNCTION_NAME", false),
    ActiveJobStatus = 216 => (Basic, "ACTIVE_JOB_STATUS", false),
    EndStatus = 217 => (Basic, "END_STATUS", false),
    ProcessorAffinity = 218 => (Basic, "PROCESSOR_AFFINITY", false),
    ThreadResourcesAffinity = 219 => (Basic, "THREAD_RESOURCES_AFFINITY", false),

    // --- Elapsed performance (JOBI0150) ----------------------------------
    ElapsedTime = 301 => (Performance, "ELAPSED_TIME", false),
    ElapsedCpuTime = 302 => (Performance, "ELAPSED_CPU_TIME", false),
    /// CPU use over the measurement interval, in tenths of a percent.
    ElapsedCpuPercent = 303 => (Performance, "ELAPSED_CPU_PERCENT", false),
    ElapsedInteractiveTransactions = 304 => (Performance, "ELAPSED_INTERACTIVE_TRANSACTIONS", false),
    ElapsedTotalResponseTime = 305 => (Performance, "ELAPSED_TOTAL_RESPONSE_TIME", false),
    ElapsedDiskIo = 306 => (Performance, "ELAPSED_DISK_IO", false),
    ElapsedAsyncDiskIo = 307 => (Performance, "ELAPSED_ASYNC_DISK_IO", false),
    ElapsedSyncDiskIo = 308 => (Performance, "ELAPSED_SYNC_DISK_IO", false),
    ElapsedPageFaults = 309 => (Performance, "ELAPSED_PAGE_FAULTS", false),
    ElapsedLockWaitTime = 310 => (Performance, "ELAPSED_LOCK_WAIT_TIME", false),
    ElapsedDbLockWaitTime = 311 => (Performance, "ELAPSED_DB_LOCK_WAIT_TIME", false),
    CpuTimeUsedLarge = 312 => (Performance, "CPU_TIME_USED_LARGE", false),
    DiskIoTotal = 313 => (Performance, "DISK_IO_TOTAL", false),
    TempStorageUsed = 314 => (Performance, "TEMP_STORAGE_USED", false),
    PeakTempStorage = 315 => (Performance, "PEAK_TEMP_STORAGE", false),
    ThreadCount = 316 => (Performance, "THREAD_COUNT", false),
    MaxThreads = 317 => (Performance, "MAX_THREADS", false),
    PageFaultsTotal = 318 => (Performance, "PAGE_FAULTS_TOTAL", false),
    DatabaseCpuTime = 319 => (Performance, "DATABASE_CPU_TIME", false),
    DatabasePagingRate = 320 => (Performance, "DATABASE_PAGING_RATE", false),
    ElapsedCommitOperations = 321 => (Performance, "ELAPSED_COMMIT_OPERATIONS", false),
    ElapsedRollbackOperations = 322 => (Performance, "ELAPSED_ROLLBACK_OPERATIONS", false),

    // --- Active work (JOBI0200) -------------------------------------------
    /// Qualified subsystem description the job runs in.
    Subsystem = 401 => (ActiveWork, "SUBSYSTEM", false),
    MemoryPoolName = 402 => (ActiveWork, "MEMORY_POOL_NAME", false),
    CurrentUser = 403 => (ActiveWork, "CURRENT_USER", false),
    GroupProfileName = 404 => (ActiveWork, "GROUP_PROFILE_NAME", false),
    JobUserIdentity = 405 => (ActiveWork, "JOB_USER_IDENTITY", false),
    JobUserIdentitySetting = 406 => (ActiveWork, "JOB_USER_IDENTITY_SETTING", false),
    ClientIpAddress = 407 => (ActiveWork, "CLIENT_IP_ADDRESS", false),
    ClientPort = 408 => (ActiveWork, "CLIENT_PORT", false),
    ServerType = 409 => (ActiveWork, "SERVER_TYPE", false),
    ProcessId = 410 => (ActiveWork, "PROCESS_ID", false),
    ThreadId = 411 => (ActiveWork, "THREAD_ID", false),
    SignalStatus = 412 => (ActiveWork, "SIGNAL_STATUS", false),
    ClientApplication = 413 => (ActiveWork, "CLIENT_APPLICATION", false),
    ClientWorkstation = 414 => (ActiveWork, "CLIENT_WORKSTATION", false),
    ClientUserId = 415 => (ActiveWork, "CLIENT_USER_ID", false),
    SignalBlockingMask = 416 => (ActiveWork, "SIGNAL_BLOCKING_MASK", false),
    ProcessGroupId = 417 => (ActiveWork, "PROCESS_GROUP_ID", false),

    // --- Queues and submission (JOBI0300) ---------------------------------
    JobQueue = 501 => (Queues, "JOB_QUEUE", true),
    JobQueuePriority = 502 => (Queues, "JOB_QUEUE_PRIORITY", true),
    JobQueueStatus = 503 => (Queues, "JOB_QUEUE_STATUS", false),
    DatePutOnJobQueue = 504 => (Queues, "DATE_PUT_ON_JOB_QUEUE", false),
    ScheduleDate = 505 => (Queues, "SCHEDULE_DATE", true),
    OutputQueue = 506 => (Queues, "OUTPUT_QUEUE", true),
    OutputQueuePriority = 507 => (Queues, "OUTPUT_QUEUE_PRIORITY", true),
    PrinterDeviceName = 508 => (Queues, "PRINTER_DEVICE_NAME", true),
    PrintText = 509 => (Queues, "PRINT_TEXT", true),
    SpooledFileAction = 510 => (Queues, "SPOOLED_FILE_ACTION", true),
    SubmittedByJobName = 511 => (Queues, "SUBMITTED_BY_JOB_NAME", false),
    SubmittedByUser = 512 => (Queues, "SUBMITTED_BY_USER", false),
    SubmittedByJobNumber = 513 => (Queues, "SUBMITTED_BY_JOB_NUMBER", false),
    /// Century/date/time stamp, `CYYMMDDHHMMSS`.
    DateEnteredSystem = 514 => (Queues, "DATE_ENTERED_SYSTEM", false),
    DateStarted = 515 => (Queues, "DATE_STARTED", false),
    DateEnded = 516 => (Queues, "DATE_ENDED", false),
    DateLastActive = 517 => (Queues, "DATE_LAST_ACTIVE", false),
    SpooledFileCount = 518 => (Queues, "SPOOLED_FILE_COUNT", false),
    ScheduleTime = 519 => (Queues, "SCHEDULE_TIME", true),
    SubmittedByWorkstation = 520 => (Queues, "SUBMITTED_BY_WORKSTATION", false),
    HeldOnJobQueue = 521 => (Queues, "HELD_ON_JOB_QUEUE", false),

    // --- Definition (JOBI0400) --------------------------------------------
    AccountingCode = 601 => (Definition, "ACCOUNTING_CODE", true),
    BreakMessageHandling = 602 => (Definition, "BREAK_MESSAGE_HANDLING", true),
    Ccsid = 603 => (Definition, "CCSID", true),
    DefaultCcsid = 604 => (Definition, "DEFAULT_CCSID", false),
    CountryId = 605 => (Definition, "COUNTRY_ID", true),
    LanguageId = 606 => (Definition, "LANGUAGE_ID", true),
    SortSequenceTable = 607 => (Definition, "SORT_SEQUENCE_TABLE", true),
    DateFormat = 608 => (Definition, "DATE_FORMAT", true),
    DateSeparator = 609 => (Definition, "DATE_SEPARATOR", true),
    TimeSeparator = 610 => (Definition, "TIME_SEPARATOR", true),
    DecimalFormat = 611 => (Definition, "DECIMAL_FORMAT", true),
    StatusMessageHandling = 612 => (Definition, "STATUS_MESSAGE_HANDLING", true),
    InquiryMessageReply = 613 => (Definition, "INQUIRY_MESSAGE_REPLY", true),
    KeepDdmConnectionsActive = 614 => (Definition, "KEEP_DDM_CONNECTIONS_ACTIVE", true),
    DeviceRecoveryAction = 615 => (Definition, "DEVICE_RECOVERY_ACTION", true),
    TimeZone = 616 => (Definition, "TIME_ZONE", true),
    JobDate = 617 => (Definition, "JOB_DATE", true),
    JobDescription = 618 => (Definition, "JOB_DESCRIPTION", false),
    /// Eight job switches as `0`/`1` characters.
    JobSwitches = 619 => (Definition, "JOB_SWITCHES", true),
    MessageQueueAction = 620 => (Definition, "MESSAGE_QUEUE_ACTION", true),
    MessageQueueMaxSize = 621 => (Definition, "MESSAGE_QUEUE_MAX_SIZE", false),
    RoutingData = 622 => (Definition, "ROUTING_DATA", false),
    EndSeverity = 623 => (Definition, "END_SEVERITY", false),
    PrintKeyFormat = 624 => (Definition, "PRINT_KEY_FORMAT", true),
    CharacterIdControl = 625 => (Definition, "CHARACTER_ID_CONTROL", true),
    ModeName = 626 => (Definition, "MODE_NAME", false),
    UnitOfWorkId = 627 => (Definition, "UNIT_OF_WORK_ID", false),
    LocalLocationName = 628 => (Definition, "LOCAL_LOCATION_NAME", false),
    RemoteLocationName = 629 => (Definition, "REMOTE_LOCATION_NAME", false),
    NetworkId = 630 => (Definition, "NETWORK_ID", false),
    AllowMultipleThreads = 631 => (Definition, "ALLOW_MULTIPLE_THREADS", false),
    AspGroup = 632 => (Definition, "ASP_GROUP", false),
    JobLogOutput = 633 => (Definition, "JOB_LOG_OUTPUT", true),
    JobLogPending = 634 => (Definition, "JOB_LOG_PENDING", false),
    DbcsCapable = 635 => (Definition, "DBCS_CAPABLE", false),
    SpecialEnvironment = 636 => (Definition, "SPECIAL_ENVIRONMENT", false),
    ProductReturnCode = 637 => (Definition, "PRODUCT_RETURN_CODE", false),
    UserReturnCode = 638 => (Definition, "USER_RETURN_CODE", false),
    ProgramReturnCode = 639 => (Definition, "PROGRAM_RETURN_CODE", false),
    JobEndReason = 640 => (Definition, "JOB_END_REASON", false),
    CompletionStatus = 641 => (Definition, "COMPLETION_STATUS", false),
    ControlledEndRequested = 642 => (Definition, "CONTROLLED_END_REQUESTED", false),
    SignedOnJob = 643 => (Definition, "SIGNED_ON_JOB", false),
    CurrencySymbol = 644 => (Definition, "CURRENCY_SYMBOL", true),
    ThousandsSeparator = 645 => (Definition, "THOUSANDS_SEPARATOR", true),
    TimeFormat = 646 => (Definition, "TIME_FORMAT", true),
    DuplicateJobOption = 647 => (Definition, "DUPLICATE_JOB_OPTION", true),
    TimeZoneOffset = 648 => (Definition, "TIME_ZONE_OFFSET", false),
    JobPriorityLimit = 649 => (Definition, "JOB_PRIORITY_LIMIT", false),
    OutputPriorityLimit = 650 => (Definition, "OUTPUT_PRIORITY_LIMIT", false),

    // --- Message logging (JOBI0500) ---------------------------------------
    LoggingLevel = 701 => (Logging, "LOGGING_LEVEL", true),
    LoggingSeverity = 702 => (Logging, "LOGGING_SEVERITY", true),
    LoggingText = 703 => (Logging, "LOGGING_TEXT", true),
    LogClPrograms = 704 => (Logging, "LOG_CL_PROGRAMS", true),

    // --- Library list (JOBI0700, variable tail) ---------------------------
    /// System portion of the library list, blank-separated.
    SystemLibraryList = 801 => (LibraryList, "SYSTEM", false),
    ProductLibraryList = 802 => (LibraryList, "PRODUCT", false),
    CurrentLibrary = 803 => (LibraryList, "CURRENT", false),
    UserLibraryList = 804 => (LibraryList, "USER", false),
}

impl JobAttribute {
    /// Attributes carried by a format group (identification attributes
    /// belong to the header and are excluded here).
    pub fn in_group(group: FormatGroup) -> impl Iterator<Item = JobAttribute> {
        Self::ALL
            .iter()
            .copied()
            .filter(move |a| a.format() == group)
    }

    /// The identification attributes present in every reply header.
    pub const IDENTIFICATION: &'static [JobAttribute] = &[
        JobAttribute::JobName,
        JobAttribute::UserName,
        JobAttribute::JobNumber,
        JobAttribute::InternalJobId,
        JobAttribute::JobStatus,
        JobAttribute::JobType,
        JobAttribute::JobSubtype,
    ];

    /// The attribute's host field type, when it lives in a fixed layout.
    /// Library-list attributes decode from the variable tail and have none.
    pub fn field_kind(self) -> Option<FieldKind> {
        self.format()
            .layout()
            .field(self.field_name())
            .map(|def| def.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn codes_are_unique() {
        let codes: HashSet<u32> = JobAttribute::ALL.iter().map(|a| a.code()).collect();
        assert_eq!(codes.len(), JobAttribute::ALL.len());
        assert_eq!(JobAttribute::ALL.len(), 144);
    }

    #[test]
    fn from_code_round_trips() {
        for attr in JobAttribute::ALL {
            assert_eq!(JobAttribute::from_code(attr.code()), Some(*attr));
        }
        assert_eq!(JobAttribute::from_code(0), None);
        assert_eq!(JobAttribute::from_code(9999), None);
    }

    #[test]
    fn every_fixed_attribute_exists_in_its_layout() {
        for attr in JobAttribute::ALL {
            if attr.format() == FormatGroup::LibraryList {
                assert!(attr.field_kind().is_none(), "{attr:?}");
            } else {
                assert!(
                    attr.field_kind().is_some(),
                    "{attr:?} names a field missing from {}",
                    attr.format().request_name()
                );
            }
        }
    }

    #[test]
    fn settable_attributes_have_wire_types() {
        for attr in JobAttribute::ALL.iter().filter(|a| a.is_settable()) {
            assert!(attr.field_kind().is_some(), "{attr:?}");
        }
    }

    #[test]
    fn catalog_spans_every_group() {
        for group in FormatGroup::ALL {
            assert!(
                JobAttribute::in_group(*group).next().is_some(),
                "no attributes in {group:?}"
            );
        }
    }

    #[test]
    fn identification_lives_in_the_header() {
        for attr in JobAttribute::IDENTIFICATION {
            // Header fields resolve in every group's layout.
            for group in FormatGroup::ALL {
                assert!(group.layout().field(attr.field_name()).is_some());
            }
        }
    }
}
