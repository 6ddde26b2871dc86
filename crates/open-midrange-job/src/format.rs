//! Retrieve-format record layouts.
//!
//! The retrieve-job-information program answers in one of several fixed
//! binary formats; each format carries one group of attributes. Every
//! reply starts with the same header: byte counts, then the job
//! identification block.
//!
//! The library-list format (`JOBI0700`) is fixed only through its four
//! list counters; the library names follow as counted variable tails and
//! are decoded by offset arithmetic in the proxy.

use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use open_midrange_record::{FieldKind, LayoutBuilder, RecordLayout};

/// Attribute groups, one per retrieve format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormatGroup {
    /// `JOBI0100` — identification plus basic runtime numbers.
    Basic,
    /// `JOBI0150` — elapsed performance statistics.
    Performance,
    /// `JOBI0200` — active-work info (subsystem, pool, client).
    ActiveWork,
    /// `JOBI0300` — job/output queue and submission info.
    Queues,
    /// `JOBI0400` — definition attributes.
    Definition,
    /// `JOBI0500` — message logging attributes.
    Logging,
    /// `JOBI0700` — library list (variable tail).
    LibraryList,
}

impl FormatGroup {
    /// Every group, in format-number order.
    pub const ALL: &'static [FormatGroup] = &[
        FormatGroup::Basic,
        FormatGroup::Performance,
        FormatGroup::ActiveWork,
        FormatGroup::Queues,
        FormatGroup::Definition,
        FormatGroup::Logging,
        FormatGroup::LibraryList,
    ];

    /// The format name sent on the retrieve call.
    pub fn request_name(self) -> &'static str {
        match self {
            FormatGroup::Basic => "JOBI0100",
            FormatGroup::Performance => "JOBI0150",
            FormatGroup::ActiveWork => "JOBI0200",
            FormatGroup::Queues => "JOBI0300",
            FormatGroup::Definition => "JOBI0400",
            FormatGroup::Logging => "JOBI0500",
            FormatGroup::LibraryList => "JOBI0700",
        }
    }

    /// The reply layout for this format.
    pub fn layout(self) -> &'static RecordLayout {
        match self {
            FormatGroup::Basic => &BASIC,
            FormatGroup::Performance => &PERFORMANCE,
            FormatGroup::ActiveWork => &ACTIVE_WORK,
            FormatGroup::Queues => &QUEUES,
            FormatGroup::Definition => &DEFINITION,
            FormatGroup::Logging => &LOGGING,
            FormatGroup::LibraryList => &LIBRARY_LIST,
        }
    }
}

/// Initial reply buffer capacity for a group. The library-list reply can
/// exceed its fixed layout by the four name lists; the proxy regrows the
/// buffer from the header's available-bytes count when this guess is short.
pub fn reply_capacity(group: FormatGroup) -> usize {
    match group {
        // Counters plus room for 4 * 64 libraries of 11 bytes each.
        FormatGroup::LibraryList => LIBRARY_LIST.length() + 4 * 64 * LIBRARY_NAME_LEN,
        other => other.layout().length(),
    }
}

/// Each library-list entry: 10-character name plus one pad byte.
pub const LIBRARY_NAME_LEN: usize = 11;

/// Every reply starts with byte counts and the identification block.
fn header(name: &str) -> LayoutBuilder {
    RecordLayout::builder(name)
        .field("BYTES_RETURNED", FieldKind::Bin4)
        .field("BYTES_AVAILABLE", FieldKind::Bin4)
        .field("JOB_NAME", FieldKind::Char(10))
        .field("USER_NAME", FieldKind::Char(10))
        .field("JOB_NUMBER", FieldKind::Char(6))
        .field("INTERNAL_JOB_ID", FieldKind::Hex(16))
        .field("JOB_STATUS", FieldKind::Char(10))
        .field("JOB_TYPE", FieldKind::Char(1))
        .field("JOB_SUBTYPE", FieldKind::Char(1))
}

static BASIC: LazyLock<RecordLayout> = LazyLock::new(|| {
    header("JOBI0100")
        .field("RUN_PRIORITY", FieldKind::Bin4)
        .field("TIME_SLICE", FieldKind::Bin4)
        .field("DEFAULT_WAIT_TIME", FieldKind::Bin4)
        .field("CPU_TIME_USED", FieldKind::Bin4)
        .field("SYSTEM_POOL_ID", FieldKind::Bin4)
        .field("MAX_CPU_TIME", FieldKind::Bin4)
        .field("MAX_TEMP_STORAGE", FieldKind::Bin4)
        .field("AUXILIARY_IO_REQUESTS", FieldKind::Bin4)
        .field("INTERACTIVE_TRANSACTIONS", FieldKind::Bin4)
        .field("TOTAL_RESPONSE_TIME", FieldKind::Bin4)
        .field("JOB_TYPE_ENHANCED", FieldKind::Bin4)
        .field("PURGE", FieldKind::Char(1))
        .field("TIME_SLICE_END_POOL", FieldKind::Char(10))
        .field("FUNCTION_TYPE", FieldKind::Char(1))
        .field("FUNCTION_NAME", FieldKind::Char(10))
        .field("ACTIVE_JOB_STATUS", FieldKind::Char(4))
        .field("END_STATUS", FieldKind::Char(1))
        .field("PROCESSOR_AFFINITY", FieldKind::Char(10))
        .field("THREAD_RESOURCES_AFFINITY", FieldKind::Char(10))
        .build()
});

static PERFORMANCE: LazyLock<RecordLayout> = LazyLock::new(|| {
    header("JOBI0150")
        .field("ELAPSED_TIME", FieldKind::Bin8)
        .field("ELAPSED_CPU_TIME", FieldKind::Bin8)
        .field("ELAPSED_CPU_PERCENT", FieldKind::Bin4)
        .field("ELAPSED_INTERACTIVE_TRANSACTIONS", FieldKind::Bin4)
        .field("ELAPSED_TOTAL_RESPONSE_TIME", FieldKind::Bin4)
        .field("ELAPSED_DISK_IO", FieldKind::Bin8)
        .field("ELAPSED_ASYNC_DISK_IO", FieldKind::Bin8)
        .field("ELAPSED_SYNC_DISK_IO", FieldKind::Bin8)
        .field("ELAPSED_PAGE_FAULTS", FieldKind::Bin4)
        .field("ELAPSED_LOCK_WAIT_TIME", FieldKind::Bin4)
        .field("ELAPSED_DB_LOCK_WAIT_TIME", FieldKind::Bin4)
        .field("CPU_TIME_USED_LARGE", FieldKind::Bin8)
        .field("DISK_IO_TOTAL", FieldKind::Bin8)
        .field("TEMP_STORAGE_USED", FieldKind::Bin4)
        .field("PEAK_TEMP_STORAGE", FieldKind::Bin4)
        .field("THREAD_COUNT", FieldKind::Bin4)
        .field("MAX_THREADS", FieldKind::Bin4)
        .field("PAGE_FAULTS_TOTAL", FieldKind::Bin4)
        .field("DATABASE_CPU_TIME", FieldKind::Bin8)
        .field("DATABASE_PAGING_RATE", FieldKind::Bin4)
        .field("ELAPSED_COMMIT_OPERATIONS", FieldKind::Bin4)
        .field("ELAPSED_ROLLBACK_OPERATIONS", FieldKind::Bin4)
        .build()
});

static ACTIVE_WORK: LazyLock<RecordLayout> = LazyLock::new(|| {
    header("JOBI0200")
        .field("SUBSYSTEM", FieldKind::Char(20))
        .field("MEMORY_POOL_NAME", FieldKind::Char(10))
        .field("CURRENT_USER", FieldKind::Char(10))
        .field("GROUP_PROFILE_NAME", FieldKind::Char(10))
        .field("JOB_USER_IDENTITY", FieldKind::Char(10))
        .field("JOB_USER_IDENTITY_SETTING", FieldKind::Char(1))
        .field("CLIENT_IP_ADDRESS", FieldKind::Char(15))
        .field("CLIENT_PORT", FieldKind::Bin4)
        .field("SERVER_TYPE", FieldKind::Char(30))
        .field("PROCESS_ID", FieldKind::Bin4)
        .field("THREAD_ID", FieldKind::Hex(8))
        .field("SIGNAL_STATUS", FieldKind::Char(1))
        .field("CLIENT_APPLICATION", FieldKind::Char(10))
        .field("CLIENT_WORKSTATION", FieldKind::Char(10))
        .field("CLIENT_USER_ID", FieldKind::Char(10))
        .field("SIGNAL_BLOCKING_MASK", FieldKind::Hex(8))
        .field("PROCESS_GROUP_ID", FieldKind::Bin4)
        .build()
});

static QUEUES: LazyLock<RecordLayout> = LazyLock::new(|| {
    header("JOBI0300")
        .field("JOB_QUEUE", FieldKind::Char(20))
        .field("JOB_QUEUE_PRIORITY", FieldKind::Char(2))
        .field("JOB_QUEUE_STATUS", FieldKind::Char(10))
        .field("DATE_PUT_ON_JOB_QUEUE", FieldKind::Char(13))
        .field("SCHEDULE_DATE", FieldKind::Char(13))
        .field("OUTPUT_QUEUE", FieldKind::Char(20))
        .field("OUTPUT_QUEUE_PRIORITY", FieldKind::Char(2))
        .field("PRINTER_DEVICE_NAME", FieldKind::Char(10))
        .field("PRINT_TEXT", FieldKind::Char(30))
        .field("SPOOLED_FILE_ACTION", FieldKind::Char(10))
        .field("SUBMITTED_BY_JOB_NAME", FieldKind::Char(10))
        .field("SUBMITTED_BY_USER", FieldKind::Char(10))
        .field("SUBMITTED_BY_JOB_NUMBER", FieldKind::Char(6))
        .field("DATE_ENTERED_SYSTEM", FieldKind::Char(13))
        .field("DATE_STARTED", FieldKind::Char(13))
        .field("DATE_ENDED", FieldKind::Char(13))
        .field("DATE_LAST_ACTIVE", FieldKind::Char(13))
        .field("SPOOLED_FILE_COUNT", FieldKind::Bin4)
        .field("SCHEDULE_TIME", FieldKind::Char(8))
        .field("SUBMITTED_BY_WORKSTATION", FieldKind::Char(10))
        .field("HELD_ON_JOB_QUEUE", FieldKind::Char(1))
        .build()
});

static DEFINITION: LazyLock<RecordLayout> = LazyLock::new(|| {
    header("JOBI0400")
        .field("ACCOUNTING_CODE", FieldKind::Char(15))
        .field("BREAK_MESSAGE_HANDLING", FieldKind::Char(10))
        .field("CCSID", FieldKind::Bin4)
        .field("DEFAULT_CCSID", FieldKind::Bin4)
        .field("COUNTRY_ID", FieldKind::Char(8))
        .field("LANGUAGE_ID", FieldKind::Char(8))
        .field("SORT_SEQUENCE_TABLE", FieldKind::Char(20))
        .field("DATE_FORMAT", FieldKind::Char(4))
        .field("DATE_SEPARATOR", FieldKind::Char(1))
        .field("TIME_SEPARATOR", FieldKind::Char(1))
        .field("DECIMAL_FORMAT", FieldKind::Char(1))
        .field("STATUS_MESSAGE_HANDLING", FieldKind::Char(10))
        .field("INQUIRY_MESSAGE_REPLY", FieldKind::Char(10))
        .field("KEEP_DDM_CONNECTIONS_ACTIVE", FieldKind::Char(10))
        .field("DEVICE_RECOVERY_ACTION", FieldKind::Char(13))
        .field("TIME_ZONE", FieldKind::Char(10))
        .field("JOB_DATE", FieldKind::Char(7))
        .field("JOB_DESCRIPTION", FieldKind::Char(20))
        .field("JOB_SWITCHES", FieldKind::Char(8))
        .field("MESSAGE_QUEUE_ACTION", FieldKind::Char(10))
        .field("MESSAGE_QUEUE_MAX_SIZE", FieldKind::Bin4)
        .field("ROUTING_DATA", FieldKind::Char(80))
        .field("END_SEVERITY", FieldKind::Bin4)
        .field("PRINT_KEY_FORMAT", FieldKind::Char(10))
        .field("CHARACTER_ID_CONTROL", FieldKind::Char(10))
        .field("MODE_NAME", FieldKind::Char(8))
        .field("UNIT_OF_WORK_ID", FieldKind::Char(24))
        .field("LOCAL_LOCATION_NAME", FieldKind::Char(8))
        .field("REMOTE_LOCATION_NAME", FieldKind::Char(8))
        .field("NETWORK_ID", FieldKind::Char(8))
        .field("ALLOW_MULTIPLE_THREADS", FieldKind::Char(1))
        .field("ASP_GROUP", FieldKind::Char(10))
        .field("JOB_LOG_OUTPUT", FieldKind::Char(10))
        .field("JOB_LOG_PENDING", FieldKind::Char(1))
        .field("DBCS_CAPABLE", FieldKind::Char(1))
        .field("SPECIAL_ENVIRONMENT", FieldKind::Char(10))
        .field("PRODUCT_RETURN_CODE", FieldKind::Bin4)
        .field("USER_RETURN_CODE", FieldKind::Bin4)
        .field("PROGRAM_RETURN_CODE", FieldKind::Bin4)
        .field("JOB_END_REASON", FieldKind::Bin4)
        .field("COMPLETION_STATUS", FieldKind::Char(1))
        .field("CONTROLLED_END_REQUESTED", FieldKind::Char(1))
        .field("SIGNED_ON_JOB", FieldKind::Char(1))
        .field("CURRENCY_SYMBOL", FieldKind::Char(1))
        .field("THOUSANDS_SEPARATOR", FieldKind::Char(1))
        .field("TIME_FORMAT", FieldKind::Char(4))
        .field("DUPLICATE_JOB_OPTION", FieldKind::Char(10))
        .field("TIME_ZONE_OFFSET", FieldKind::Bin4)
        .field("JOB_PRIORITY_LIMIT", FieldKind::Bin4)
        .field("OUTPUT_PRIORITY_LIMIT", FieldKind::Bin4)
        .build()
});

static LOGGING: LazyLock<RecordLayout> = LazyLock::new(|| {
    header("JOBI0500")
        .field("LOGGING_LEVEL", FieldKind::Char(1))
        .field("LOGGING_SEVERITY", FieldKind::Bin4)
        .field("LOGGING_TEXT", FieldKind::Char(10))
        .field("LOG_CL_PROGRAMS", FieldKind::Char(10))
        .build()
});

static LIBRARY_LIST: LazyLock<RecordLayout> = LazyLock::new(|| {
    header("JOBI0700")
        .field("SYSTEM_LIBRARY_COUNT", FieldKind::Bin4)
        .field("PRODUCT_LIBRARY_COUNT", FieldKind::Bin4)
        .field("CURRENT_LIBRARY_COUNT", FieldKind::Bin4)
        .field("USER_LIBRARY_COUNT", FieldKind::Bin4)
        .build()
});
