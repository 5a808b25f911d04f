use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use nexmo_alarm_callback::dispatch::expand_template;
use nexmo_alarm_callback::prelude::*;

struct NullClient;

impl SmsClient for NullClient {
    fn send(&self, req: SendRequest<'_>) -> Result<SendResponse, SmsError> {
        Ok(SendResponse {
            id: req.to.to_string(),
            provider: "null",
            raw: serde_json::Value::Null,
        })
    }
}

fn context() -> DispatchContext {
    DispatchContext::new("Production errors").with_message(MessageSummary::new("web-01"))
}

fn benchmark_template_expansion(c: &mut Criterion) {
    let ctx = context();
    let template = "[source] raised an alert in [stream]. Check [stream] now.";

    c.bench_function("expand_template", |b| {
        b.iter(|| black_box(expand_template(black_box(template), &ctx)))
    });
}

fn benchmark_dispatch(c: &mut Criterion) {
    let ctx = context();
    let mut group = c.benchmark_group("dispatch");

    for recipients in [1usize, 10, 100] {
        let to = (0..recipients)
            .map(|i| format!("4477009{:05}", i))
            .collect::<Vec<_>>()
            .join(",");
        let config = Configuration::from_pairs([
            ("from", "Graylog".to_string()),
            ("to", to),
            ("text", "[source] alert in [stream]".to_string()),
        ]);

        group.bench_with_input(
            BenchmarkId::new("recipients", recipients),
            &config,
            |b, config| {
                let dispatcher = MessageDispatcher::new(config, &NullClient);
                b.iter(|| black_box(dispatcher.dispatch(&ctx)))
            },
        );
    }
    group.finish();
}

criterion_group!(benches, benchmark_template_expansion, benchmark_dispatch);
criterion_main!(benches);
