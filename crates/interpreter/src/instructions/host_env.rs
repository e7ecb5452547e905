use crate::{primitives::U256, Host, Interpreter};

/// EIP-1344: ChainID opcode
pub(crate) fn chainid<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    check_eip!(interpreter, CHAINID_1344);
    push!(interpreter, U256::from(host.env().cfg.chain_id));
}

pub(crate) fn coinbase<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    push_b256!(interpreter, host.env().block.coinbase.into_word());
}

pub(crate) fn timestamp<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    push!(interpreter, host.env().block.timestamp);
}

pub(crate) fn number<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    push!(interpreter, host.env().block.number);
}

/// `DIFFICULTY` reads `PREVRANDAO` after the merge (EIP-4399).
pub(crate) fn difficulty<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    let block = &host.env().block;
    match block.prevrandao {
        Some(prevrandao) if interpreter.rules.is_enabled_in(crate::primitives::SpecId::MERGE) => {
            push_b256!(interpreter, prevrandao);
        }
        _ => push!(interpreter, block.difficulty),
    }
}

pub(crate) fn gaslimit<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    push!(interpreter, host.env().block.gas_limit);
}

pub(crate) fn gasprice<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    push!(interpreter, host.env().tx.gas_price);
}

/// EIP-3198: BASEFEE opcode
pub(crate) fn basefee<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    check_eip!(interpreter, BASEFEE_3198);
    push!(interpreter, host.env().block.basefee);
}

pub(crate) fn origin<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    push_b256!(interpreter, host.env().tx.origin.into_word());
}

#[cfg(test)]
mod tests {
    use crate::{
        opcode::*,
        primitives::{b256, Env, RuleSet, SpecId, U256},
        Contract, DummyHost, InstructionResult, Interpreter,
    };

    fn run(code: &[u8], spec: SpecId, host: &mut DummyHost) -> Interpreter {
        let contract = Contract::new(
            Default::default(),
            code,
            Default::default(),
            Default::default(),
            U256::ZERO,
        );
        let mut interp = Interpreter::new(contract, 1000, false, RuleSet::new(spec));
        interp.run(host);
        interp
    }

    #[test]
    fn difficulty_becomes_prevrandao() {
        let mut env = Env::default();
        env.block.difficulty = U256::from(7);
        env.block.prevrandao = Some(b256!(
            "0000000000000000000000000000000000000000000000000000000000000009"
        ));
        let mut host = DummyHost::new(env);
        let interp = run(&[DIFFICULTY], SpecId::LONDON, &mut host);
        assert_eq!(interp.stack.data(), &vec![U256::from(7)]);
        let interp = run(&[DIFFICULTY], SpecId::MERGE, &mut host);
        assert_eq!(interp.stack.data(), &vec![U256::from(9)]);
    }

    #[test]
    fn chainid_and_basefee_activation() {
        let mut host = DummyHost::default();
        let interp = run(&[CHAINID], SpecId::PETERSBURG, &mut host);
        assert_eq!(interp.instruction_result, InstructionResult::NotActivated);
        let interp = run(&[CHAINID, BASEFEE], SpecId::ISTANBUL, &mut host);
        assert_eq!(interp.instruction_result, InstructionResult::NotActivated);
        assert_eq!(interp.stack.data(), &vec![U256::from(1)]);
        let interp = run(&[BASEFEE], SpecId::LONDON, &mut host);
        assert_eq!(interp.instruction_result, InstructionResult::Stop);
    }
}
