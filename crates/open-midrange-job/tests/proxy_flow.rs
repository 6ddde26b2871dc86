//! End-to-end proxy lifecycle against a scripted transport: lazy reads
//! across format groups, staged writes flushed in one change call, and a
//! control command invalidating the cache.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use open_midrange_access::{
    AccessError, HostMessage, HostSystem, HostTransport, Parameter, PassthroughConverter,
    QualifiedName,
};
use open_midrange_record::RecordBuilder;

use open_midrange_job::{EndMode, FormatGroup, Job, JobAttribute, JobIdentity};

#[derive(Default)]
struct Shared {
    replies: HashMap<String, Vec<u8>>,
    retrieves: Vec<String>,
    changes: Vec<Vec<u8>>,
    commands: Vec<String>,
}

struct ScriptedHost(Arc<Mutex<Shared>>);

impl HostTransport for ScriptedHost {
    fn run_program(
        &mut self,
        program: &QualifiedName,
        parameters: &mut [Parameter],
    ) -> Result<(), AccessError> {
        let mut shared = self.0.lock();
        match program.object() {
            "QUSRJOBI" => {
                let format = match &parameters[2] {
                    Parameter::Input(data) => String::from_utf8_lossy(data).trim().to_string(),
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
            "QWTCHGJB" => {
                if let Parameter::Input(request) = &parameters[3] {
                    shared.changes.push(request.clone());
                }
                Ok(())
            }
            other => panic!("unexpected program {other}"),
        }
    }

    fn run_command(&mut self, text: &str) -> Result<Vec<HostMessage>, AccessError> {
        self.0.lock().commands.push(text.to_string());
        Ok(vec![])
    }
}

fn reply(group: FormatGroup, fill: impl FnOnce(&mut RecordBuilder<'_>)) -> Vec<u8> {
    let conv = PassthroughConverter;
    let mut builder = RecordBuilder::new(group.layout(), &conv);
    builder.set_text("JOB_NAME", "NIGHTBATCH").unwrap();
    builder.set_text("USER_NAME", "QPGMR").unwrap();
    builder.set_text("JOB_NUMBER", "042617").unwrap();
    builder.set_bytes("INTERNAL_JOB_ID", &[0x42; 16]).unwrap();
    builder.set_text("JOB_STATUS", "*ACTIVE").unwrap();
    builder.set_text("JOB_TYPE", "B").unwrap();
    builder.set_text("JOB_SUBTYPE", "").unwrap();
    fill(&mut builder);
    builder.into_bytes()
}

fn harness() -> (Arc<Mutex<Shared>>, Arc<HostSystem>) {
    let mut replies = HashMap::new();
    replies.insert(
        "JOBI0100".to_string(),
        reply(FormatGroup::Basic, |b| {
            b.set_int("RUN_PRIORITY", 50).unwrap();
            b.set_int("TIME_SLICE", 5000).unwrap();
            b.set_int("CPU_TIME_USED", 98765).unwrap();
        }),
    );
    replies.insert(
        "JOBI0200".to_string(),
        reply(FormatGroup::ActiveWork, |b| {
            b.set_text("SUBSYSTEM", "QBATCH").unwrap();
            b.set_text("CURRENT_USER", "QPGMR").unwrap();
            b.set_int("PROCESS_ID", 4711).unwrap();
        }),
    );
    let shared = Arc::new(Mutex::new(Shared {
        replies,
        ..Shared::default()
    }));
    let system = HostSystem::new(
        Box::new(ScriptedHost(Arc::clone(&shared))),
        Arc::new(PassthroughConverter),
    );
    (shared, system)
}

#[test]
fn inspect_tune_and_end_a_batch_job() {
    let (shared, system) = harness();
    let job = Job::new(
        system,
        JobIdentity::qualified("NIGHTBATCH", "QPGMR", "042617").unwrap(),
    );

    // Reads group by group, identification riding along.
    assert_eq!(job.run_priority().unwrap(), 50);
    assert_eq!(job.status().unwrap(), "*ACTIVE");
    assert_eq!(job.subsystem().unwrap(), "QBATCH");
    assert_eq!(job.int(JobAttribute::ProcessId).unwrap(), 4711);
    assert_eq!(shared.lock().retrieves, vec!["JOBI0100", "JOBI0200"]);

    // Stage two changes, observe them locally, flush once.
    job.set_int(JobAttribute::RunPriority, 30).unwrap();
    job.set_text(JobAttribute::TimeSliceEndPool, "*BASE").unwrap();
    assert_eq!(job.run_priority().unwrap(), 30);
    assert_eq!(job.pending(), 2);

    job.commit().unwrap();
    assert_eq!(job.pending(), 0);

    let changes = shared.lock().changes.clone();
    assert_eq!(changes.len(), 1);
    let request = &changes[0];
    assert_eq!(&request[0..4], &2i32.to_be_bytes());
    // First entry: run priority, binary.
    assert_eq!(&request[8..12], &201i32.to_be_bytes());
    assert_eq!(request[12], b'B');
    assert_eq!(&request[20..24], &30i32.to_be_bytes());
    // Second entry: time-slice-end pool, character.
    assert_eq!(&request[28..32], &213i32.to_be_bytes());
    assert_eq!(request[32], b'C');
    assert_eq!(&request[40..45], b"*BASE");

    // Control commands drop the cache; the next read refetches.
    job.end(EndMode::Controlled { delay_seconds: 120 }).unwrap();
    assert_eq!(
        shared.lock().commands,
        vec!["ENDJOB JOB(042617/QPGMR/NIGHTBATCH) OPTION(*CNTRLD) DELAY(120)"]
    );
    assert_eq!(job.int(JobAttribute::CpuTimeUsed).unwrap(), 98765);
    assert_eq!(shared.lock().retrieves.len(), 3);
}
