//! `for` loops as an explicit state machine.
//!
//! ```text
//! Init -> CheckCond -> Body -> Step -> CheckCond -> ... -> Done
//!              \________________________________________/
//!                           (condition false)
//! ```
//!
//! `break` jumps to `Done`, `continue` to `Step`, and `return` leaves the
//! machine with the function's value. The header's declarations live in a
//! scope of their own around the whole loop.

use crate::env::Env;
use crate::flow::Flow;
use crate::interpreter::Interpreter;
use minic_syntax::ast::{Expr, Stmt};
use minic_syntax::error::Result;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopState {
    Init,
    CheckCond,
    Body,
    Step,
    Done,
}

impl<'p> Interpreter<'p> {
    pub(crate) fn exec_for(
        &mut self,
        env: &mut Env,
        init: Option<&Stmt>,
        cond: Option<&Expr>,
        step: Option<&Stmt>,
        body: &[Stmt],
    ) -> Result<Flow> {
        env.push_scope();
        let flow = self.run_for(env, init, cond, step, body);
        env.pop_scope();
        flow
    }

    fn run_for(
        &mut self,
        env: &mut Env,
        init: Option<&Stmt>,
        cond: Option<&Expr>,
        step: Option<&Stmt>,
        body: &[Stmt],
    ) -> Result<Flow> {
        let mut state = LoopState::Init;
        loop {
            trace!(?state, "for loop");
            state = match state {
                LoopState::Init => {
                    if let Some(s) = init {
                        if let flow @ (Flow::Return(_) | Flow::Break) = self.exec_stmt(env, s)? {
                            return Ok(settle(flow));
                        }
                    }
                    LoopState::CheckCond
                }
                LoopState::CheckCond => {
                    let go = match cond {
                        Some(c) => self.eval_expr(env, c)?.truthy()?,
                        None => true,
                    };
                    if go {
                        LoopState::Body
                    } else {
                        LoopState::Done
                    }
                }
                LoopState::Body => match self.exec_block(env, body)? {
                    Flow::Normal | Flow::Continue => LoopState::Step,
                    Flow::Break => LoopState::Done,
                    Flow::Return(v) => return Ok(Flow::Return(v)),
                },
                LoopState::Step => {
                    if let Some(s) = step {
                        if let flow @ (Flow::Return(_) | Flow::Break) = self.exec_stmt(env, s)? {
                            return Ok(settle(flow));
                        }
                    }
                    LoopState::CheckCond
                }
                LoopState::Done => return Ok(Flow::Normal),
            };
        }
    }
}

/// Header statements never yield control flow when produced by the parser;
/// for hand-built trees a `break` there ends this loop and a `return`
/// unwinds as usual.
fn settle(flow: Flow) -> Flow {
    match flow {
        Flow::Break => Flow::Normal,
        other => other,
    }
}
