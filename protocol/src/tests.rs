use crate::{buffer::*, *};
use std::collections::BTreeMap;

const MAX: usize = DEFAULT_MAX_FRAME_SIZE;

#[test]
fn bools() {
    let mut buf = FrameBuffer::new();
    buf.push_back(&true).unwrap();
    assert_eq!(buf.as_slice(), &[1]);
    assert_eq!(buf.pop_front::<bool>(), Ok(true));
    assert!(buf.is_empty());
    buf.push_back_byte(2).unwrap();
    assert_eq!(buf.pop_front::<bool>(), Err(Error::InvalidValue));
    assert_eq!(buf.as_slice(), &[2]);
}

#[test]
fn options() {
    let mut buf = FrameBuffer::new();
    buf.push_back(&Some(false)).unwrap();
    buf.push_back(&Some(42u8)).unwrap();
    buf.push_back::<Option<u64>>(&None).unwrap();
    assert_eq!(buf.as_slice(), &[1, 0, 1, 42, 0]);
    assert_eq!(buf.pop_front::<Option<bool>>(), Ok(Some(false)));
    assert_eq!(buf.pop_front::<Option<u8>>(), Ok(Some(42u8)));
    assert_eq!(buf.pop_front::<Option<u64>>(), Ok(None));
    assert!(buf.is_empty());
}

#[test]
fn strings_are_length_prefixed() {
    let mut buf = FrameBuffer::new();
    buf.push_back(&"hi".to_string()).unwrap();
    assert_eq!(buf.as_slice(), &[2, 0, 0, 0, b'h', b'i']);
    assert_eq!(buf.pop_front::<String>(), Ok("hi".to_string()));
}

#[test]
fn invalid_utf8() {
    let mut buf = FrameBuffer::new();
    buf.push_back(&vec![0xffu8, 0xfe]).unwrap();
    assert_eq!(buf.pop_front::<String>(), Err(Error::InvalidUtf8));
    assert_eq!(buf.len(), 6);
}

#[test]
fn maps() {
    let mut map = BTreeMap::new();
    map.insert("b".to_string(), vec![1u8, 2, 3]);
    map.insert("a".to_string(), vec![]);
    let mut buf = FrameBuffer::new();
    buf.push_back(&map).unwrap();
    assert_eq!(buf.pop_front::<BTreeMap<String, Vec<u8>>>(), Ok(map));
    assert!(buf.is_empty());
}

#[test]
fn short_read_rewinds() {
    let mut buf = FrameBuffer::new();
    buf.push_back(&"hello".to_string()).unwrap();
    let bytes = buf.take();
    buf.extend_bytes(&bytes[..6]).unwrap();
    assert_eq!(buf.pop_front::<String>(), Err(Error::UnexpectedEnd));
    assert_eq!(buf.len(), 6);
    buf.extend_bytes(&bytes[6..]).unwrap();
    assert_eq!(buf.pop_front::<String>(), Ok("hello".to_string()));
}

#[test]
fn exec_messages() {
    let init = Frame::Exec {
        stream: 3,
        message: ExecMessage::new(
            "p1",
            ExecInput::Init(InitMessage {
                container_id: "c1".to_string(),
                meta: Meta {
                    args: vec!["/bin/sh".to_string(), "-c".to_string(), "true".to_string()],
                    env: vec!["PATH=/bin".to_string()],
                    cwd: "/".to_string(),
                    ..Default::default()
                },
                fds: vec![0, 1, 2],
                ..Default::default()
            }),
        ),
    };
    let file = Frame::Exec {
        stream: 3,
        message: ExecMessage::new(
            "p1",
            ExecInput::File(FdMessage {
                fd: 1,
                eof: false,
                data: b"output".to_vec(),
            }),
        ),
    };
    let exit = Frame::Exec {
        stream: 3,
        message: ExecMessage::new(
            "p1",
            ExecInput::Exit(ExitMessage {
                code: UNKNOWN_EXIT_STATUS,
                error: Some(Status::new(Code::Unknown, "container failed")),
            }),
        ),
    };
    let mut buf = FrameBuffer::new();
    buf.push_frame(&init, MAX).unwrap();
    buf.push_frame(&file, MAX).unwrap();
    buf.push_frame(&exit, MAX).unwrap();
    assert_eq!(buf.pop_frame::<Frame>(MAX), Ok(Some(init)));
    assert_eq!(buf.pop_frame::<Frame>(MAX), Ok(Some(file)));
    assert_eq!(buf.pop_frame::<Frame>(MAX), Ok(Some(exit)));
    assert_eq!(buf.pop_frame::<Frame>(MAX), Ok(None));
}

#[test]
fn reply_with_status() {
    let mut status = Status::new(Code::NotFound, "no such ref: x");
    status.solve = Some(SolveErrorDetail {
        input_ids: vec!["w1".to_string(), String::new()],
        mount_ids: vec![],
        subject: None,
    });
    let frame = Frame::Reply {
        stream: 7,
        result: Err(status),
    };
    let mut buf = FrameBuffer::new();
    buf.push_frame(&frame, MAX).unwrap();
    assert_eq!(buf.pop_frame::<Frame>(MAX), Ok(Some(frame)));
}

#[test]
fn incomplete_frame() {
    let frame = Frame::Call {
        stream: 1,
        request: Request::Solve(SolveRequest {
            definition: Some(Definition::image("busybox")),
            allow_result_return: true,
            cache_imports: vec![None],
            ..Default::default()
        }),
    };
    let mut buf = FrameBuffer::new();
    buf.push_frame(&frame, MAX).unwrap();
    let bytes = buf.take();
    for split in 0..bytes.len() {
        buf.reset();
        buf.extend_bytes(&bytes[..split]).unwrap();
        assert_eq!(buf.pop_frame::<Frame>(MAX), Ok(None));
        assert_eq!(buf.len(), split);
        buf.extend_bytes(&bytes[split..]).unwrap();
        assert_eq!(buf.pop_frame::<Frame>(MAX), Ok(Some(frame.clone())));
        assert!(buf.is_empty());
    }
}

#[test]
fn oversized_frames() {
    let frame = Frame::Exec {
        stream: 1,
        message: ExecMessage::new(
            "p",
            ExecInput::File(FdMessage {
                fd: 0,
                eof: false,
                data: vec![0; 100],
            }),
        ),
    };
    let mut buf = FrameBuffer::new();
    assert!(matches!(buf.push_frame(&frame, 64), Err(Error::FrameTooLarge(_))));
    assert!(buf.is_empty());
    buf.push_frame(&frame, MAX).unwrap();
    assert!(matches!(buf.pop_frame::<Frame>(64), Err(Error::FrameTooLarge(_))));
}

#[test]
fn fill() {
    let mut buf = FrameBuffer::new();
    buf.push_back(&0x1234u16).unwrap();
    let region = buf.begin_fill(16);
    assert_eq!(region.len(), 16);
    region[..2].copy_from_slice(&0x5678u16.to_le_bytes());
    buf.commit_fill(16, 2);
    assert_eq!(buf.pop_front::<u16>(), Ok(0x1234));
    assert_eq!(buf.pop_front::<u16>(), Ok(0x5678));
    assert!(buf.is_empty());
}
