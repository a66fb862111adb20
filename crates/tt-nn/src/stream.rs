//! `stream_to_nn` (spec §4.5): one case per [`Stream`] variant.

use tt_ast::{Scope, Stream};
use tt_common::list::List;
use tt_common::token::TerminalKind;
use tt_common::ThingTalkError;

use crate::context::{kw, name_and_type_token, NnContext};
use crate::table::{on_params_to_nn, table_to_nn};
use crate::value_to_nn;

pub fn stream_to_nn(stream: &Stream, scope: &Scope, ctx: &mut NnContext) -> Result<List, ThingTalkError> {
    match stream {
        Stream::Monitor { table, args } => {
            let mut parts = vec![
                List::singleton(kw("monitor")),
                List::singleton(kw("(")),
                table_to_nn(table, scope, ctx)?,
                List::singleton(kw(")")),
            ];
            if let Some(names) = args {
                parts.push(List::singleton(kw("on")));
                parts.push(List::singleton(kw("new")));
                match names.as_slice() {
                    [single] => {
                        parts.push(List::singleton(name_and_type_token(TerminalKind::Param, single.clone(), None)))
                    }
                    many => {
                        parts.push(List::singleton(kw("[")));
                        for (i, name) in many.iter().enumerate() {
                            if i > 0 {
                                parts.push(List::singleton(kw(",")));
                            }
                            parts.push(List::singleton(name_and_type_token(TerminalKind::Param, name.clone(), None)));
                        }
                        parts.push(List::singleton(kw("]")));
                    }
                }
            }
            Ok(List::concat(parts))
        }

        Stream::Edge { stream, filter } => {
            let cnf = tt_filter::normalize(filter)?;
            Ok(List::concat([
                List::singleton(kw("edge")),
                List::singleton(kw("(")),
                stream_to_nn(stream, scope, ctx)?,
                List::singleton(kw(")")),
                List::singleton(kw("on")),
                crate::filter::cnf_filter_to_nn(&cnf, scope, ctx)?,
            ]))
        }

        Stream::AtTimer { times, expiration_date } => {
            let mut parts = vec![List::singleton(kw("attimer"))];
            for (i, time) in times.iter().enumerate() {
                if i > 0 {
                    parts.push(List::singleton(kw(",")));
                }
                parts.push(List::singleton(kw("time")));
                parts.push(List::singleton(kw("=")));
                parts.push(value_to_nn(time, scope, ctx)?);
            }
            if let Some(exp) = expiration_date {
                parts.push(List::singleton(kw(",")));
                parts.push(List::singleton(kw("expiration_date")));
                parts.push(List::singleton(kw("=")));
                parts.push(value_to_nn(exp, scope, ctx)?);
            }
            Ok(List::concat(parts))
        }

        Stream::Timer { base, interval, frequency } => {
            let mut parts = vec![
                List::singleton(kw("timer")),
                List::singleton(kw("base")),
                List::singleton(kw("=")),
                value_to_nn(base, scope, ctx)?,
                List::singleton(kw(",")),
                List::singleton(kw("interval")),
                List::singleton(kw("=")),
                value_to_nn(interval, scope, ctx)?,
            ];
            if let Some(freq) = frequency {
                parts.push(List::singleton(kw(",")));
                parts.push(List::singleton(kw("frequency")));
                parts.push(List::singleton(kw("=")));
                parts.push(value_to_nn(freq, scope, ctx)?);
            }
            Ok(List::concat(parts))
        }

        Stream::Filter { stream, filter } => {
            let cnf = tt_filter::normalize(filter)?;
            Ok(List::concat([
                List::singleton(kw("(")),
                stream_to_nn(stream, scope, ctx)?,
                List::singleton(kw(")")),
                List::singleton(kw("filter")),
                List::singleton(kw("{")),
                crate::filter::cnf_filter_to_nn(&cnf, scope, ctx)?,
                List::singleton(kw("}")),
            ]))
        }

        Stream::Join { lhs, rhs, in_params } => {
            let mut parts = vec![
                List::singleton(kw("(")),
                stream_to_nn(lhs, scope, ctx)?,
                List::singleton(kw(")")),
                List::singleton(kw("=>")),
                List::singleton(kw("(")),
                table_to_nn(rhs, scope, ctx)?,
                List::singleton(kw(")")),
            ];
            parts.push(on_params_to_nn(in_params, scope, ctx)?);
            Ok(List::concat(parts))
        }
    }
}
