//! The job proxy.
//!
//! A [`Job`] fronts one host job. Reads are lazy: asking for an attribute
//! fetches its whole format group in one retrieve call and memoizes every
//! attribute the reply carries, header identification included. Writes are
//! staged locally and flushed in one change call; until then a staged value
//! shadows whatever the host last reported.

use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

use open_midrange_access::{HostSystem, Parameter, QualifiedName};
use open_midrange_record::{FieldValue, RecordDecoder, RecordError};

use crate::attribute::JobAttribute;
use crate::change::ChangeSet;
use crate::error::JobError;
use crate::format::{reply_capacity, FormatGroup, LIBRARY_NAME_LEN};
use crate::identity::JobIdentity;
use crate::Result;

const HOST_LIBRARY: &str = "QSYS";
const RETRIEVE_PROGRAM: &str = "QUSRJOBI";
const CHANGE_PROGRAM: &str = "QWTCHGJB";
const CHANGE_FORMAT: &str = "JOBC0100";

/// How an end request takes the job down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndMode {
    /// Let the job clean up, forcing it off after the delay.
    Controlled { delay_seconds: u32 },
    /// Take the job down now.
    Immediate,
}

/// A proxy for one job on a connected host.
#[derive(Debug)]
pub struct Job {
    system: Arc<HostSystem>,
    identity: JobIdentity,
    state: Mutex<State>,
}

#[derive(Debug)]
struct State {
    values: HashMap<JobAttribute, FieldValue>,
    loaded: HashSet<FormatGroup>,
    staged: ChangeSet,
    batching: bool,
}

impl Default for State {
    fn default() -> Self {
        Self {
            values: HashMap::new(),
            loaded: HashSet::new(),
            staged: ChangeSet::new(),
            batching: true,
        }
    }
}

impl Job {
    /// A proxy for the job `identity` addresses. No host call happens
    /// until an attribute is read.
    pub fn new(system: Arc<HostSystem>, identity: JobIdentity) -> Self {
        Self {
            system,
            identity,
            state: Mutex::new(State::default()),
        }
    }

    /// A proxy for the job this session runs in.
    pub fn current(system: Arc<HostSystem>) -> Self {
        Self::new(system, JobIdentity::Current)
    }

    /// How this proxy addresses its job.
    pub fn identity(&self) -> &JobIdentity {
        &self.identity
    }

    // --- attribute reads --------------------------------------------------

    /// An attribute's value, fetching its format group on a cache miss.
    ///
    /// A staged-but-uncommitted value shadows the host's.
    pub fn value(&self, attribute: JobAttribute) -> Result<FieldValue> {
        {
            let state = self.state.lock();
            if let Some(value) = state.staged.get(attribute) {
                return Ok(value.clone());
            }
            if let Some(value) = state.values.get(&attribute) {
                return Ok(value.clone());
            }
            if state.loaded.contains(&attribute.format()) {
                return Err(JobError::AttributeUnavailable(attribute));
            }
        }
        self.load(attribute.format())?;
        self.state
            .lock()
            .values
            .get(&attribute)
            .cloned()
            .ok_or(JobError::AttributeUnavailable(attribute))
    }

    /// The cached or staged value, without going to the host.
    pub fn cached(&self, attribute: JobAttribute) -> Option<FieldValue> {
        let state = self.state.lock();
        state
            .staged
            .get(attribute)
            .or_else(|| state.values.get(&attribute))
            .cloned()
    }

    /// A character attribute.
    pub fn text(&self, attribute: JobAttribute) -> Result<String> {
        match self.value(attribute)? {
            FieldValue::Text(s) => Ok(s),
            _ => Err(JobError::ValueType {
                attribute,
                expected: "text",
            }),
        }
    }

    /// A numeric attribute, widening whole decimals.
    pub fn int(&self, attribute: JobAttribute) -> Result<i64> {
        self.value(attribute)?
            .as_int()
            .ok_or(JobError::ValueType {
                attribute,
                expected: "integer",
            })
    }

    /// A numeric attribute as a decimal.
    pub fn decimal(&self, attribute: JobAttribute) -> Result<Decimal> {
        self.value(attribute)?
            .as_decimal()
            .ok_or(JobError::ValueType {
                attribute,
                expected: "decimal",
            })
    }

    /// The job name.
    pub fn name(&self) -> Result<String> {
        self.text(JobAttribute::JobName)
    }

    /// The user profile the job runs under.
    pub fn user(&self) -> Result<String> {
        self.text(JobAttribute::UserName)
    }

    /// The six-digit job number.
    pub fn number(&self) -> Result<String> {
        self.text(JobAttribute::JobNumber)
    }

    /// Overall job status (`*ACTIVE`, `*JOBQ`, `*OUTQ`).
    pub fn status(&self) -> Result<String> {
        self.text(JobAttribute::JobStatus)
    }

    /// The qualified subsystem the job is active in.
    pub fn subsystem(&self) -> Result<String> {
        self.text(JobAttribute::Subsystem)
    }

    /// Run priority (1 strongest, 99 weakest).
    pub fn run_priority(&self) -> Result<i64> {
        self.int(JobAttribute::RunPriority)
    }

    /// The user portion of the job's library list, in search order.
    pub fn library_list(&self) -> Result<Vec<String>> {
        let text = self.text(JobAttribute::UserLibraryList)?;
        Ok(text.split_whitespace().map(str::to_string).collect())
    }

    // --- attribute writes -------------------------------------------------

    /// Whether writes batch locally (the default) or flush immediately.
    ///
    /// With batching off, each `set_*` call becomes its own single-entry
    /// change call.
    pub fn stage_changes(&self, batching: bool) {
        self.state.lock().batching = batching;
    }

    /// Stage a change; with batching on, nothing reaches the host until
    /// [`Job::commit`].
    pub fn set_value(&self, attribute: JobAttribute, value: FieldValue) -> Result<()> {
        {
            let mut state = self.state.lock();
            state.staged.stage(attribute, value)?;
            if state.batching {
                return Ok(());
            }
        }
        self.commit()
    }

    /// Stage a character attribute change.
    pub fn set_text(&self, attribute: JobAttribute, text: &str) -> Result<()> {
        self.set_value(attribute, FieldValue::Text(text.to_string()))
    }

    /// Stage a numeric attribute change.
    pub fn set_int(&self, attribute: JobAttribute, value: i64) -> Result<()> {
        self.set_value(attribute, FieldValue::Int(value))
    }

    /// Number of staged, uncommitted changes.
    pub fn pending(&self) -> usize {
        self.state.lock().staged.len()
    }

    /// Flush every staged change in one change-job call.
    ///
    /// On success the staged values fold into the cache; on failure they
    /// stay staged so the caller can retry or roll back. Only the values
    /// actually sent are unstaged, so anything staged while the call is in
    /// flight stays pending for the next flush.
    pub fn commit(&self) -> Result<()> {
        let converter = Arc::clone(self.system.converter());
        let sent = {
            let state = self.state.lock();
            if state.staged.is_empty() {
                return Ok(());
            }
            state.staged.clone()
        };
        let request = sent.to_request(converter.as_ref())?;
        let (qualified, internal) = self.identity.to_parameters(converter.as_ref())?;
        let program = QualifiedName::new(HOST_LIBRARY, CHANGE_PROGRAM)?;
        let mut parameters = [
            Parameter::input(qualified),
            Parameter::input(internal),
            Parameter::input(converter.encode(CHANGE_FORMAT, 8)?),
            Parameter::input(request),
        ];
        self.system.run_program(&program, &mut parameters)?;

        let mut state = self.state.lock();
        debug!(job = %self.identity, changed = sent.len(), "changes committed");
        for (attribute, value) in sent.iter() {
            // The host applied this value; a restage during the call keeps
            // its newer value staged and shadowing the cache.
            state.staged.unstage(attribute, value);
            state.values.insert(attribute, value.clone());
        }
        Ok(())
    }

    /// Discard every staged change.
    pub fn rollback(&self) {
        self.state.lock().staged.clear();
    }

    // --- cache control ----------------------------------------------------

    /// Drop the attribute cache; staged changes survive. The next read
    /// refetches from the host.
    pub fn refresh(&self) {
        let mut state = self.state.lock();
        state.values.clear();
        state.loaded.clear();
    }

    /// Fetch one format group now.
    pub fn load(&self, group: FormatGroup) -> Result<()> {
        let reply = self.fetch(group)?;
        self.absorb(group, &reply)
    }

    /// Fetch every format group.
    pub fn load_all(&self) -> Result<()> {
        for group in FormatGroup::ALL {
            self.load(*group)?;
        }
        Ok(())
    }

    // --- host control commands --------------------------------------------

    /// Hold the job (`HLDJOB`), optionally holding its spooled files too.
    pub fn hold(&self, hold_spooled_files: bool) -> Result<()> {
        let spooled = if hold_spooled_files { "*YES" } else { "*NO" };
        let job = self.command_name()?;
        self.control(&format!("HLDJOB JOB({job}) SPLFILE({spooled})"))
    }

    /// Release a held job (`RLSJOB`).
    pub fn release(&self) -> Result<()> {
        let job = self.command_name()?;
        self.control(&format!("RLSJOB JOB({job})"))
    }

    /// End the job (`ENDJOB`).
    pub fn end(&self, mode: EndMode) -> Result<()> {
        let job = self.command_name()?;
        let command = match mode {
            EndMode::Controlled { delay_seconds } => {
                format!("ENDJOB JOB({job}) OPTION(*CNTRLD) DELAY({delay_seconds})")
            }
            EndMode::Immediate => format!("ENDJOB JOB({job}) OPTION(*IMMED)"),
        };
        self.control(&command)
    }

    /// Run a control command and drop the now-stale cache.
    fn control(&self, command: &str) -> Result<()> {
        let messages = self.system.run_command(command)?;
        debug!(job = %self.identity, command, messages = messages.len(), "job control");
        self.refresh();
        Ok(())
    }

    /// The `number/user/name` form control commands take. Resolved through
    /// the header attributes when the proxy is not addressed that way.
    fn command_name(&self) -> Result<String> {
        if let JobIdentity::Qualified { name, user, number } = &self.identity {
            return Ok(format!("{number}/{user}/{name}"));
        }
        let name = self.text(JobAttribute::JobName)?;
        let user = self.text(JobAttribute::UserName)?;
        let number = self.text(JobAttribute::JobNumber)?;
        Ok(format!("{number}/{user}/{name}"))
    }

    // --- retrieve plumbing ------------------------------------------------

    /// One retrieve call, regrowing the reply buffer when the header's
    /// available-bytes count says the reply did not fit (a long library
    /// list can exceed the initial capacity).
    fn fetch(&self, group: FormatGroup) -> Result<Vec<u8>> {
        let mut capacity = reply_capacity(group);
        for _ in 0..3 {
            let reply = self.retrieve(group, capacity)?;
            let available = bytes_available(group, &self.system, &reply)?;
            if available <= capacity {
                return Ok(reply);
            }
            debug!(
                job = %self.identity,
                format = group.request_name(),
                capacity,
                available,
                "reply truncated, regrowing"
            );
            capacity = available;
        }
        // The list kept growing between calls; the last reply stands.
        self.retrieve(group, capacity)
    }

    fn retrieve(&self, group: FormatGroup, capacity: usize) -> Result<Vec<u8>> {
        let converter = self.system.converter();
        let (qualified, internal) = self.identity.to_parameters(converter.as_ref())?;
        let program = QualifiedName::new(HOST_LIBRARY, RETRIEVE_PROGRAM)?;
        let mut parameters = [
            Parameter::output(capacity),
            Parameter::input((capacity as i32).to_be_bytes().to_vec()),
            Parameter::input(converter.encode(group.request_name(), 8)?),
            Parameter::input(qualified),
            Parameter::input(internal),
        ];
        self.system.run_program(&program, &mut parameters)?;
        debug!(job = %self.identity, format = group.request_name(), "group retrieved");
        Ok(parameters[0].output_data().to_vec())
    }

    /// Memoize every attribute a reply carries.
    fn absorb(&self, group: FormatGroup, reply: &[u8]) -> Result<()> {
        let converter = self.system.converter();
        let decoder = RecordDecoder::new(group.layout(), reply, converter.as_ref());

        let mut state = self.state.lock();
        for attribute in JobAttribute::IDENTIFICATION {
            let value = decoder.value(attribute.field_name())?;
            state.values.insert(*attribute, value);
        }
        if group == FormatGroup::LibraryList {
            self.absorb_library_lists(&decoder, reply, &mut state)?;
        } else {
            for attribute in JobAttribute::in_group(group) {
                let value = decoder.value(attribute.field_name())?;
                state.values.insert(attribute, value);
            }
        }
        state.loaded.insert(group);
        Ok(())
    }

    /// The library-list reply ends in four counted name lists. Each entry
    /// is a 10-character name plus a pad byte; the lists are consecutive
    /// and follow the fixed counters directly.
    fn absorb_library_lists(
        &self,
        decoder: &RecordDecoder<'_>,
        reply: &[u8],
        state: &mut State,
    ) -> Result<()> {
        let converter = self.system.converter();
        let mut offset = FormatGroup::LibraryList.layout().length();
        let lists = [
            (JobAttribute::SystemLibraryList, "SYSTEM_LIBRARY_COUNT"),
            (JobAttribute::ProductLibraryList, "PRODUCT_LIBRARY_COUNT"),
            (JobAttribute::CurrentLibrary, "CURRENT_LIBRARY_COUNT"),
            (JobAttribute::UserLibraryList, "USER_LIBRARY_COUNT"),
        ];
        for (attribute, count_field) in lists {
            let count = decoder.int(count_field)?.max(0) as usize;
            let mut names = Vec::with_capacity(count);
            for _ in 0..count {
                let end = offset + LIBRARY_NAME_LEN;
                let entry = reply.get(offset..end).ok_or_else(|| RecordError::Truncated {
                    layout: FormatGroup::LibraryList.layout().name().to_string(),
                    field: count_field.to_string(),
                    needed: end,
                    actual: reply.len(),
                })?;
                let name = converter.decode(&entry[..LIBRARY_NAME_LEN - 1])?;
                names.push(name.trim_end().to_string());
                offset = end;
            }
            state
                .values
                .insert(attribute, FieldValue::Text(names.join(" ")));
        }
        Ok(())
    }
}

/// The reply header's total-available byte count.
fn bytes_available(group: FormatGroup, system: &HostSystem, reply: &[u8]) -> Result<usize> {
    let converter = system.converter();
    let decoder = RecordDecoder::new(group.layout(), reply, converter.as_ref());
    Ok(decoder.int("BYTES_AVAILABLE")?.max(0) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use open_midrange_access::{
        AccessError, HostMessage, HostTransport, PassthroughConverter, Severity, TextConverter,
    };
    use open_midrange_record::RecordBuilder;

    #[derive(Default)]
    struct Shared {
        replies: HashMap<String, Vec<u8>>,
        retrieves: Vec<String>,
        changes: Vec<Vec<u8>>,
        commands: Vec<String>,
        fail_change: bool,
        stage_during_change: Option<(Arc<Job>, JobAttribute, i64)>,
    }

    struct MockHost(Arc<Mutex<Shared>>);

    impl HostTransport for MockHost {
        fn run_program(
            &mut self,
            program: &QualifiedName,
            parameters: &mut [Parameter],
        ) -> std::result::Result<(), AccessError> {
            let mut shared = self.0.lock();
            match program.object() {
                RETRIEVE_PROGRAM => {
                    let format = match &parameters[2] {
                        Parameter::Input(data) => {
                            String::from_utf8_lossy(data).trim().to_string()
                        }
                        other => panic!("format parameter not input: {other:?}"),
                    };
                    shared.retrieves.push(format.clone());
                    let reply = shared.replies.get(&format).cloned().unwrap_or_default();
                    if let Parameter::Output { capacity, data } = &mut parameters[0] {
                        let mut buf = reply;
                        buf.resize(*capacity, 0);
                        *data = buf;
                    }
                    Ok(())
                }
                CHANGE_PROGRAM => {
                    if shared.fail_change {
                        return Err(AccessError::ProgramFailed {
                            program: program.to_string(),
                            messages: vec![HostMessage::new(
                                "CPF1343",
                                "Job not valid for function",
                                Severity::Error,
                            )],
                        });
                    }
                    if let Parameter::Input(request) = &parameters[3] {
                        shared.changes.push(request.clone());
                    }
                    if let Some((job, attribute, value)) = shared.stage_during_change.take() {
                        job.set_int(attribute, value).unwrap();
                    }
                    Ok(())
                }
                other => panic!("unexpected program {other}"),
            }
        }

        fn run_command(
            &mut self,
            text: &str,
        ) -> std::result::Result<Vec<HostMessage>, AccessError> {
            self.0.lock().commands.push(text.to_string());
            Ok(vec![])
        }
    }

    fn header(builder: &mut RecordBuilder<'_>) {
        builder.set_int("BYTES_RETURNED", 0).unwrap();
        builder.set_int("BYTES_AVAILABLE", 0).unwrap();
        builder.set_text("JOB_NAME", "QPADEV01").unwrap();
        builder.set_text("USER_NAME", "ALICE").unwrap();
        builder.set_text("JOB_NUMBER", "123456").unwrap();
        builder.set_bytes("INTERNAL_JOB_ID", &[0xAB; 16]).unwrap();
        builder.set_text("JOB_STATUS", "*ACTIVE").unwrap();
        builder.set_text("JOB_TYPE", "I").unwrap();
        builder.set_text("JOB_SUBTYPE", "").unwrap();
    }

    fn basic_reply(conv: &dyn TextConverter) -> Vec<u8> {
        let layout = FormatGroup::Basic.layout();
        let mut builder = RecordBuilder::new(layout, conv);
        header(&mut builder);
        builder.set_int("RUN_PRIORITY", 20).unwrap();
        builder.set_int("TIME_SLICE", 2000).unwrap();
        builder.set_int("CPU_TIME_USED", 1234).unwrap();
        builder.set_text("ACTIVE_JOB_STATUS", "RUN").unwrap();
        builder.into_bytes()
    }

    fn logging_reply(conv: &dyn TextConverter) -> Vec<u8> {
        let layout = FormatGroup::Logging.layout();
        let mut builder = RecordBuilder::new(layout, conv);
        header(&mut builder);
        builder.set_text("LOGGING_LEVEL", "4").unwrap();
        builder.set_int("LOGGING_SEVERITY", 30).unwrap();
        builder.set_text("LOGGING_TEXT", "*SECLVL").unwrap();
        builder.into_bytes()
    }

    fn library_reply(conv: &dyn TextConverter) -> Vec<u8> {
        let layout = FormatGroup::LibraryList.layout();
        let mut builder = RecordBuilder::new(layout, conv);
        header(&mut builder);
        builder.set_int("SYSTEM_LIBRARY_COUNT", 2).unwrap();
        builder.set_int("PRODUCT_LIBRARY_COUNT", 0).unwrap();
        builder.set_int("CURRENT_LIBRARY_COUNT", 1).unwrap();
        builder.set_int("USER_LIBRARY_COUNT", 2).unwrap();
        let mut reply = builder.into_bytes();
        for name in ["QSYS", "QSYS2", "MYLIB", "QGPL", "QTEMP"] {
            let mut entry = vec![b' '; LIBRARY_NAME_LEN];
            entry[..name.len()].copy_from_slice(name.as_bytes());
            reply.extend_from_slice(&entry);
        }
        reply
    }

    fn harness() -> (Arc<Mutex<Shared>>, Arc<HostSystem>) {
        let conv = PassthroughConverter;
        let mut replies = HashMap::new();
        replies.insert("JOBI0100".to_string(), basic_reply(&conv));
        replies.insert("JOBI0500".to_string(), logging_reply(&conv));
        replies.insert("JOBI0700".to_string(), library_reply(&conv));
        let shared = Arc::new(Mutex::new(Shared {
            replies,
            ..Shared::default()
        }));
        let system = HostSystem::new(
            Box::new(MockHost(Arc::clone(&shared))),
            Arc::new(PassthroughConverter),
        );
        (shared, system)
    }

    fn qualified() -> JobIdentity {
        JobIdentity::qualified("QPADEV01", "ALICE", "123456").unwrap()
    }

    #[test]
    fn reads_fetch_one_group_per_miss() {
        let (shared, system) = harness();
        let job = Job::new(system, qualified());

        assert_eq!(job.run_priority().unwrap(), 20);
        assert_eq!(shared.lock().retrieves, vec!["JOBI0100"]);

        // Same group: served from cache.
        assert_eq!(job.int(JobAttribute::CpuTimeUsed).unwrap(), 1234);
        assert_eq!(shared.lock().retrieves.len(), 1);

        // Different group: one more call.
        assert_eq!(job.int(JobAttribute::LoggingSeverity).unwrap(), 30);
        assert_eq!(shared.lock().retrieves, vec!["JOBI0100", "JOBI0500"]);
    }

    #[test]
    fn identification_rides_along_with_any_group() {
        let (shared, system) = harness();
        let job = Job::new(system, qualified());

        job.load(FormatGroup::Logging).unwrap();
        assert_eq!(job.name().unwrap(), "QPADEV01");
        assert_eq!(job.user().unwrap(), "ALICE");
        assert_eq!(job.status().unwrap(), "*ACTIVE");
        assert_eq!(
            job.value(JobAttribute::InternalJobId).unwrap(),
            FieldValue::Bytes(vec![0xAB; 16])
        );
        assert_eq!(shared.lock().retrieves, vec!["JOBI0500"]);
    }

    #[test]
    fn library_list_decodes_the_variable_tail() {
        let (shared, system) = harness();
        let job = Job::new(system, qualified());

        assert_eq!(
            job.text(JobAttribute::SystemLibraryList).unwrap(),
            "QSYS QSYS2"
        );
        assert_eq!(job.text(JobAttribute::CurrentLibrary).unwrap(), "MYLIB");
        assert_eq!(job.text(JobAttribute::ProductLibraryList).unwrap(), "");
        assert_eq!(job.library_list().unwrap(), vec!["QGPL", "QTEMP"]);
        assert_eq!(shared.lock().retrieves, vec!["JOBI0700"]);
    }

    #[test]
    fn long_library_list_regrows_the_reply_buffer() {
        let (shared, system) = harness();
        let conv = PassthroughConverter;
        let names: Vec<String> = (0..300).map(|i| format!("LIB{i:05}")).collect();

        let layout = FormatGroup::LibraryList.layout();
        let total = layout.length() + names.len() * LIBRARY_NAME_LEN;
        let mut builder = RecordBuilder::new(layout, &conv);
        header(&mut builder);
        builder.set_int("BYTES_AVAILABLE", total as i64).unwrap();
        builder
            .set_int("USER_LIBRARY_COUNT", names.len() as i64)
            .unwrap();
        let mut reply = builder.into_bytes();
        for name in &names {
            let mut entry = vec![b' '; LIBRARY_NAME_LEN];
            entry[..name.len()].copy_from_slice(name.as_bytes());
            reply.extend_from_slice(&entry);
        }
        assert!(total > reply_capacity(FormatGroup::LibraryList));
        shared.lock().replies.insert("JOBI0700".to_string(), reply);

        let job = Job::new(system, qualified());
        let list = job.library_list().unwrap();
        assert_eq!(list.len(), 300);
        assert_eq!(list[0], "LIB00000");
        assert_eq!(list[299], "LIB00299");
        // First call came back short, the second used the grown buffer.
        assert_eq!(shared.lock().retrieves, vec!["JOBI0700", "JOBI0700"]);
    }

    #[test]
    fn staged_values_shadow_the_host_until_commit() {
        let (shared, system) = harness();
        let job = Job::new(system, qualified());

        job.set_int(JobAttribute::RunPriority, 99).unwrap();
        assert_eq!(job.run_priority().unwrap(), 99);
        assert!(shared.lock().retrieves.is_empty());
        assert_eq!(job.pending(), 1);

        job.commit().unwrap();
        assert_eq!(job.pending(), 0);
        assert_eq!(job.run_priority().unwrap(), 99);
        assert!(shared.lock().retrieves.is_empty());

        let changes = shared.lock().changes.clone();
        assert_eq!(changes.len(), 1);
        let request = &changes[0];
        assert_eq!(&request[0..4], &1i32.to_be_bytes());
        assert_eq!(&request[8..12], &201i32.to_be_bytes());
        assert_eq!(request[12], b'B');
        assert_eq!(&request[20..24], &99i32.to_be_bytes());
    }

    #[test]
    fn commit_only_unstages_what_it_sent() {
        let (shared, system) = harness();
        let job = Arc::new(Job::new(system, qualified()));

        job.set_int(JobAttribute::RunPriority, 30).unwrap();
        shared.lock().stage_during_change =
            Some((Arc::clone(&job), JobAttribute::TimeSlice, 800));
        job.commit().unwrap();

        // The value staged while the call was in flight was not sent and
        // stays pending; the sent value is committed into the cache.
        assert_eq!(job.pending(), 1);
        assert_eq!(
            job.cached(JobAttribute::RunPriority),
            Some(FieldValue::Int(30))
        );
        {
            let shared = shared.lock();
            assert_eq!(shared.changes.len(), 1);
            assert_eq!(&shared.changes[0][0..4], &1i32.to_be_bytes());
            assert_eq!(&shared.changes[0][8..12], &201i32.to_be_bytes());
        }

        // The next flush carries it.
        job.commit().unwrap();
        assert_eq!(job.pending(), 0);
        let shared = shared.lock();
        assert_eq!(shared.changes.len(), 2);
        assert_eq!(&shared.changes[1][0..4], &1i32.to_be_bytes());
        assert_eq!(&shared.changes[1][8..12], &202i32.to_be_bytes());
        assert_eq!(&shared.changes[1][16..20], &800i32.to_be_bytes());
    }

    #[test]
    fn mid_flight_restage_stays_staged_with_the_newer_value() {
        let (shared, system) = harness();
        let job = Arc::new(Job::new(system, qualified()));

        job.set_int(JobAttribute::RunPriority, 30).unwrap();
        shared.lock().stage_during_change =
            Some((Arc::clone(&job), JobAttribute::RunPriority, 77));
        job.commit().unwrap();

        // The host applied 30; the newer 77 is still staged and shadows it.
        assert_eq!(job.pending(), 1);
        assert_eq!(job.run_priority().unwrap(), 77);

        job.commit().unwrap();
        assert_eq!(job.pending(), 0);
        let shared = shared.lock();
        assert_eq!(&shared.changes[1][16..20], &77i32.to_be_bytes());
    }

    #[test]
    fn empty_commit_skips_the_host() {
        let (shared, system) = harness();
        let job = Job::new(system, qualified());
        job.commit().unwrap();
        assert!(shared.lock().changes.is_empty());
    }

    #[test]
    fn failed_commit_keeps_the_stage() {
        let (shared, system) = harness();
        shared.lock().fail_change = true;
        let job = Job::new(system, qualified());

        job.set_int(JobAttribute::RunPriority, 99).unwrap();
        assert!(matches!(
            job.commit(),
            Err(JobError::Access(AccessError::ProgramFailed { .. }))
        ));
        assert_eq!(job.pending(), 1);

        job.rollback();
        assert_eq!(job.pending(), 0);
    }

    #[test]
    fn read_only_attributes_refuse_staging() {
        let (_, system) = harness();
        let job = Job::new(system, qualified());
        assert!(matches!(
            job.set_int(JobAttribute::CpuTimeUsed, 0),
            Err(JobError::NotSettable(_))
        ));
    }

    #[test]
    fn control_commands_use_the_qualified_form() {
        let (shared, system) = harness();
        let job = Job::new(system, qualified());

        job.hold(true).unwrap();
        job.release().unwrap();
        job.end(EndMode::Controlled { delay_seconds: 30 }).unwrap();
        job.end(EndMode::Immediate).unwrap();

        let commands = shared.lock().commands.clone();
        assert_eq!(
            commands,
            vec![
                "HLDJOB JOB(123456/ALICE/QPADEV01) SPLFILE(*YES)",
                "RLSJOB JOB(123456/ALICE/QPADEV01)",
                "ENDJOB JOB(123456/ALICE/QPADEV01) OPTION(*CNTRLD) DELAY(30)",
                "ENDJOB JOB(123456/ALICE/QPADEV01) OPTION(*IMMED)",
            ]
        );
    }

    #[test]
    fn control_commands_drop_the_cache() {
        let (shared, system) = harness();
        let job = Job::new(system, qualified());

        assert_eq!(job.run_priority().unwrap(), 20);
        job.hold(false).unwrap();
        assert_eq!(job.run_priority().unwrap(), 20);
        assert_eq!(shared.lock().retrieves, vec!["JOBI0100", "JOBI0100"]);
    }

    #[test]
    fn current_job_resolves_its_name_for_commands() {
        let (shared, system) = harness();
        let job = Job::current(system);

        job.hold(false).unwrap();
        let shared = shared.lock();
        assert_eq!(shared.retrieves, vec!["JOBI0100"]);
        assert_eq!(
            shared.commands,
            vec!["HLDJOB JOB(123456/ALICE/QPADEV01) SPLFILE(*NO)"]
        );
    }

    #[test]
    fn refresh_keeps_staged_changes() {
        let (shared, system) = harness();
        let job = Job::new(system, qualified());

        assert_eq!(job.run_priority().unwrap(), 20);
        job.set_int(JobAttribute::TimeSlice, 500).unwrap();
        job.refresh();

        assert_eq!(job.pending(), 1);
        assert_eq!(job.int(JobAttribute::TimeSlice).unwrap(), 500);
        // Unstaged attribute refetches.
        assert_eq!(job.run_priority().unwrap(), 20);
        assert_eq!(shared.lock().retrieves.len(), 2);
    }

    #[test]
    fn unbatched_writes_flush_immediately() {
        let (shared, system) = harness();
        let job = Job::new(system, qualified());
        job.stage_changes(false);

        job.set_int(JobAttribute::RunPriority, 35).unwrap();
        job.set_int(JobAttribute::TimeSlice, 800).unwrap();

        let changes = shared.lock().changes.clone();
        assert_eq!(changes.len(), 2);
        assert_eq!(&changes[0][0..4], &1i32.to_be_bytes());
        assert_eq!(&changes[1][0..4], &1i32.to_be_bytes());
        assert_eq!(job.pending(), 0);
    }

    #[test]
    fn cached_never_calls_the_host() {
        let (shared, system) = harness();
        let job = Job::new(system, qualified());

        assert!(job.cached(JobAttribute::RunPriority).is_none());
        job.set_int(JobAttribute::RunPriority, 42).unwrap();
        assert_eq!(
            job.cached(JobAttribute::RunPriority),
            Some(FieldValue::Int(42))
        );
        assert!(shared.lock().retrieves.is_empty());
    }
}
