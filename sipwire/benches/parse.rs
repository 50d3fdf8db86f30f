use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sipwire::parser::Parser;
use sipwire::transport::{frame_buffer, MAX_RECEIVE_LENGTH};

const INVITE: &[u8] = b"INVITE sip:bob@biloxi.example.com SIP/2.0\r\n\
Via: SIP/2.0/TCP client.atlanta.example.com:5060;ttl=65;branch=z9hG4bK74bf9\r\n\
Max-Forwards: 70\r\n\
From: Alice <sip:alice@atlanta.example.com>;tag=9fxced76sl\r\n\
To: Bob <sip:bob@biloxi.example.com>\r\n\
Call-ID: 3848276298220188511@atlanta.example.com\r\n\
CSeq: 2 INVITE\r\n\
Contact: <sip:alice@client.atlanta.example.com;transport=tcp>\r\n\
Diversion: Carol <sip:carol@atlanta.example.com>;privacy=off;reason=no-answer;counter=1;screen=no\r\n\
Remote-Party-ID: Alice <sip:alice@atlanta.example.com>\r\n\
P-Asserted-Identity: Alice <sip:alice@atlanta.example.com>\r\n\
User-Agent: X-Lite release 1104o stamp 56125\r\n\
Content-Length: 0\r\n\r\n";

fn bench_parse_sip_msg(c: &mut Criterion) {
    c.bench_function("parse invite", |b| {
        b.iter(|| {
            let mut parser = Parser::new(black_box(INVITE));
            let msg = parser.parse_sip_msg().unwrap();
            black_box(msg);
        });
    });
}

fn bench_frame_buffer(c: &mut Criterion) {
    let mut stream = Vec::from(&b"\r\n"[..]);
    stream.extend_from_slice(INVITE);
    stream.extend_from_slice(INVITE);

    c.bench_function("frame two messages", |b| {
        b.iter(|| {
            let outcome = frame_buffer(black_box(&stream), MAX_RECEIVE_LENGTH).unwrap();
            black_box(outcome);
        });
    });
}

criterion_group!(benches, bench_parse_sip_msg, bench_frame_buffer);
criterion_main!(benches);
