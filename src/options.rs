//! Per-method option bundles. One struct per RPC that carries more than a
//! name, mirroring the teacher's generated `options.rs` (referenced from
//! `channel.rs` as e.g. `ExchangeDeclareOptions`, `BasicCancelOptions`)
//! but hand-written here since this crate does not run the method-table
//! code generator.

macro_rules! options {
    ($name:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
        pub struct $name {
            $(pub $field: $ty,)*
        }
    };
}

options!(ExchangeDeclareOptions {
    passive: bool,
    durable: bool,
    auto_delete: bool,
    internal: bool,
    nowait: bool,
});

options!(ExchangeDeleteOptions {
    if_unused: bool,
    nowait: bool,
});

options!(ExchangeBindOptions { nowait: bool });
options!(ExchangeUnbindOptions { nowait: bool });

options!(QueueDeclareOptions {
    passive: bool,
    durable: bool,
    exclusive: bool,
    auto_delete: bool,
    nowait: bool,
});

options!(QueueBindOptions { nowait: bool });
options!(QueuePurgeOptions { nowait: bool });

options!(QueueDeleteOptions {
    if_unused: bool,
    if_empty: bool,
    nowait: bool,
});

options!(QueueUnbindOptions {});

options!(BasicQosOptions { global: bool });

options!(BasicConsumeOptions {
    no_local: bool,
    no_ack: bool,
    exclusive: bool,
    nowait: bool,
});

options!(BasicCancelOptions { nowait: bool });

options!(BasicPublishOptions {
    mandatory: bool,
    immediate: bool,
});

options!(BasicGetOptions { no_ack: bool });
options!(ConfirmSelectOptions { nowait: bool });
