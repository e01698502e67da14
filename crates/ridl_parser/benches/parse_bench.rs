use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ridl_parser::{parse, Parser};

// A medium-size IDL source (~100 lines) covering most declaration forms
const IDL_SOURCE: &str = r#"
#pragma prefix "example.org"

// Shared definitions
module Common {
    typedef unsigned long long Timestamp;
    typedef sequence<octet, 16> Uuid;
    typedef string<64> Label;

    const long MAX_ITEMS = 1 << 10;
    const double RATIO = 0.75;
    const string VERSION = "1." "4";

    enum Severity { debug, info, warning, error };

    exception NotFound {
        Uuid id;
        string reason;
    };
};

module Inventory {
    struct Dimensions {
        float width, height, depth;
        long grid[3][3];
    };

    union Payload switch (Common::Severity) {
        case Common::debug:
        case Common::info: string text;
        case Common::warning: long code;
        default: sequence<Dimensions> shapes;
    };

    native Handle;

    typedef struct Item {
        Common::Uuid id;
        Common::Label label;
        Dimensions size;
        fixed<9, 2> price;
        Common::Timestamp updated;
    } ItemRecord, ItemBatch[Common::MAX_ITEMS / 8];

    interface Listener;

    abstract interface Named {
        readonly attribute Common::Label name;
    };

    interface Store : Named {
        attribute long capacity, reserved;
        readonly attribute unsigned short shelves;

        Item lookup(in Common::Uuid id) raises (Common::NotFound);
        void store(in Item item, out Common::Timestamp at);
        boolean move(inout Dimensions dims, in wstring note)
            raises (Common::NotFound) context ("LANG", "REGION");
        oneway void subscribe(in Listener who);
    };

    local interface Cache {
        void flush();
        any peek(in long slot);
    };

    interface Listener {
        oneway void changed(in Common::Uuid id, in Payload what);
    };

    valuetype Tag string<32>;

    abstract valuetype Describable supports Named {
        wstring describe();
    };

    valuetype Entry : truncatable Describable supports Store {
        public Item item;
        private Common::Timestamp created;
        long revision;
        factory make(in Item item, in Common::Timestamp when);
        void touch();
    };

    custom valuetype Snapshot {
        public sequence<Entry> entries;
        private ValueBase extra;
    };

    valuetype Pending;
};
"#;

fn bench_parse_idl(c: &mut Criterion) {
    c.bench_function("parse_idl_medium", |b| {
        b.iter(|| {
            let ast = parse(black_box(IDL_SOURCE));
            black_box(ast).ok();
        });
    });

    c.bench_function("parse_idl_unit", |b| {
        b.iter(|| {
            let parser = Parser::new(black_box(IDL_SOURCE));
            black_box(parser.parse_unit()).ok();
        });
    });
}

criterion_group!(benches, bench_parse_idl);
criterion_main!(benches);
