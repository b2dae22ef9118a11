use {
    clap::{
        crate_description, crate_name, crate_version, value_t, App, AppSettings, Arg, SubCommand,
    },
    cnft_client::{
        changelog::assets_from_transaction,
        metadata::{build_metadata_args, validate_metadata_args},
        pda::find_tree_authority,
        proof::{proof_accounts, LeafClaim},
        read_api::ReadApiClient,
        tree::{canopy_depth_for_account, read_header, TreeGeometry},
    },
    mpl_bubblegum::{
        instructions::{
            BurnBuilder, CreateTreeConfigBuilder, DelegateBuilder, MintV1Builder, TransferBuilder,
        },
        types::{Creator, MetadataArgs},
    },
    solana_clap_utils::{
        fee_payer::fee_payer_arg,
        input_parsers::{keypair_of, pubkey_of, value_of},
        input_validators::{is_keypair, is_parsable, is_pubkey, is_url},
        keypair::signer_from_path,
    },
    solana_client::{rpc_client::RpcClient, rpc_config::RpcTransactionConfig},
    solana_sdk::{
        commitment_config::CommitmentConfig,
        instruction::AccountMeta,
        native_token::Sol,
        pubkey::Pubkey,
        signature::{Keypair, Signature, Signer},
        system_instruction, system_program,
        transaction::Transaction,
    },
    solana_transaction_status::UiTransactionEncoding,
    std::{process::exit, str::FromStr},
};

struct Config {
    rpc_client: RpcClient,
    read_api: ReadApiClient,
    fee_payer: Box<dyn Signer>,
    verbose: bool,
    dry_run: bool,
    airdrop: bool,
}

type Error = Box<dyn std::error::Error>;
type CommandResult = Result<(), Error>;

/// Which key authorizes a leaf mutation.
enum LeafSigner {
    Owner,
    Delegate,
}

fn ensure_fee_payer_balance(config: &Config, required_balance: u64) -> Result<(), Error> {
    let balance = config.rpc_client.get_balance(&config.fee_payer.pubkey())?;
    if balance >= required_balance {
        return Ok(());
    }
    if !config.airdrop {
        return Err(format!(
            "Fee payer, {}, has insufficient balance: {} required, {} available",
            config.fee_payer.pubkey(),
            Sol(required_balance),
            Sol(balance)
        )
        .into());
    }
    let shortfall = required_balance - balance;
    println!("Requesting airdrop of {}", Sol(shortfall));
    let signature = config
        .rpc_client
        .request_airdrop(&config.fee_payer.pubkey(), shortfall)?;
    let latest_blockhash = config.rpc_client.get_latest_blockhash()?;
    config.rpc_client.confirm_transaction_with_spinner(
        &signature,
        &latest_blockhash,
        config.rpc_client.commitment(),
    )?;
    Ok(())
}

fn send_transaction(
    config: &Config,
    transaction: Transaction,
) -> Result<Option<Signature>, Error> {
    if config.dry_run {
        let result = config.rpc_client.simulate_transaction(&transaction)?;
        println!("Simulate result: {:?}", result);
        Ok(None)
    } else {
        let signature = config
            .rpc_client
            .send_and_confirm_transaction_with_spinner(&transaction)?;
        println!("Signature: {}", signature);
        Ok(Some(signature))
    }
}

/// Fetch the leaf state and Merkle proof of an asset from the read API and
/// pair it with the proof accounts trimmed to the tree's canopy.
fn fetch_leaf_claim(
    config: &Config,
    asset_id: &Pubkey,
) -> Result<(LeafClaim, Vec<AccountMeta>), Error> {
    let asset = config.read_api.get_asset(asset_id)?;
    let proof = config.read_api.get_asset_proof(asset_id)?;
    let claim = LeafClaim::from_read_api(&asset, &proof)?;

    let tree_account = config.rpc_client.get_account(&claim.tree)?;
    if tree_account.owner != spl_account_compression::id() {
        return Err(format!("Account {} is not a merkle tree account", claim.tree).into());
    }
    let header = read_header(&tree_account.data)?;
    let canopy_depth = canopy_depth_for_account(
        tree_account.data.len(),
        header.max_depth,
        header.max_buffer_size,
    )?;
    if config.verbose {
        println!(
            "Tree {}: depth {}, canopy depth {}, proof length {}",
            claim.tree,
            header.max_depth,
            canopy_depth,
            proof.proof.len()
        );
    }
    let proof_metas = proof_accounts(&proof, canopy_depth)?;
    Ok((claim, proof_metas))
}

fn leaf_signer_role(claim: &LeafClaim, signer: &Pubkey) -> Result<LeafSigner, Error> {
    if *signer == claim.owner {
        Ok(LeafSigner::Owner)
    } else if *signer == claim.delegate {
        Ok(LeafSigner::Delegate)
    } else {
        Err(format!(
            "Fee payer {} is neither the leaf owner {} nor its delegate {}",
            signer, claim.owner, claim.delegate
        )
        .into())
    }
}

fn command_create_tree(
    config: &Config,
    geometry: TreeGeometry,
    public: bool,
    tree_keypair: Keypair,
) -> CommandResult {
    let merkle_tree = tree_keypair.pubkey();
    let (tree_authority, _) = find_tree_authority(&merkle_tree);
    println!("Creating tree {}", merkle_tree);

    let account_size = geometry.account_size();
    let rent = config
        .rpc_client
        .get_minimum_balance_for_rent_exemption(account_size)?;
    if config.verbose {
        println!(
            "Capacity {} leaves, account size {} bytes, rent {}",
            geometry.capacity(),
            account_size,
            Sol(rent)
        );
    }

    let mut transaction = Transaction::new_with_payer(
        &[
            // Account for the merkle tree
            system_instruction::create_account(
                &config.fee_payer.pubkey(),
                &merkle_tree,
                rent,
                account_size as u64,
                &spl_account_compression::id(),
            ),
            // Initialize the tree config and hand the tree to the NFT program
            CreateTreeConfigBuilder::new()
                .tree_config(tree_authority)
                .merkle_tree(merkle_tree)
                .payer(config.fee_payer.pubkey())
                .tree_creator(config.fee_payer.pubkey())
                .log_wrapper(spl_noop::id())
                .compression_program(spl_account_compression::id())
                .system_program(system_program::id())
                .max_depth(geometry.max_depth)
                .max_buffer_size(geometry.max_buffer_size)
                .public(public)
                .instruction(),
        ],
        Some(&config.fee_payer.pubkey()),
    );

    let latest_blockhash = config.rpc_client.get_latest_blockhash()?;
    let fee = config.rpc_client.get_fee_for_message(transaction.message())?;
    ensure_fee_payer_balance(config, rent + fee)?;
    transaction.sign(
        &vec![config.fee_payer.as_ref(), &tree_keypair],
        latest_blockhash,
    );
    send_transaction(config, transaction)?;
    println!("Tree authority {}", tree_authority);
    Ok(())
}

fn command_mint(
    config: &Config,
    merkle_tree: Pubkey,
    owner: Pubkey,
    metadata: MetadataArgs,
) -> CommandResult {
    validate_metadata_args(&metadata)?;
    let (tree_authority, _) = find_tree_authority(&merkle_tree);
    println!("Minting {} into tree {}", metadata.name, merkle_tree);

    let mut transaction = Transaction::new_with_payer(
        &[MintV1Builder::new()
            .tree_config(tree_authority)
            .leaf_owner(owner)
            .leaf_delegate(owner)
            .merkle_tree(merkle_tree)
            .payer(config.fee_payer.pubkey())
            .tree_creator_or_delegate(config.fee_payer.pubkey())
            .log_wrapper(spl_noop::id())
            .compression_program(spl_account_compression::id())
            .system_program(system_program::id())
            .metadata(metadata)
            .instruction()],
        Some(&config.fee_payer.pubkey()),
    );

    let latest_blockhash = config.rpc_client.get_latest_blockhash()?;
    let fee = config.rpc_client.get_fee_for_message(transaction.message())?;
    ensure_fee_payer_balance(config, fee)?;
    transaction.sign(&vec![config.fee_payer.as_ref()], latest_blockhash);
    let signature = match send_transaction(config, transaction)? {
        Some(signature) => signature,
        None => return Ok(()),
    };

    // The asset id is not returned by the program; it has to be recovered
    // from the change-log event in the confirmed transaction.
    let confirmed = config.rpc_client.get_transaction_with_config(
        &signature,
        RpcTransactionConfig {
            encoding: Some(UiTransactionEncoding::Json),
            commitment: Some(CommitmentConfig::confirmed()),
            max_supported_transaction_version: Some(0),
        },
    )?;
    let minted = assets_from_transaction(&confirmed)?;
    if minted.is_empty() {
        return Err("Transaction carries no change-log event; asset id unknown".into());
    }
    for asset in minted {
        println!("Leaf index: {}", asset.leaf_index);
        println!("Asset id: {}", asset.asset_id);
    }
    Ok(())
}

fn command_transfer(config: &Config, asset_id: Pubkey, new_owner: Pubkey) -> CommandResult {
    let (claim, proof_metas) = fetch_leaf_claim(config, &asset_id)?;
    let signer = config.fee_payer.pubkey();
    let role = leaf_signer_role(&claim, &signer)?;
    let (tree_authority, _) = find_tree_authority(&claim.tree);
    println!("Transferring {} to {}", asset_id, new_owner);

    let mut transaction = Transaction::new_with_payer(
        &[TransferBuilder::new()
            .tree_config(tree_authority)
            .leaf_owner(claim.owner, matches!(role, LeafSigner::Owner))
            .leaf_delegate(claim.delegate, matches!(role, LeafSigner::Delegate))
            .new_leaf_owner(new_owner)
            .merkle_tree(claim.tree)
            .log_wrapper(spl_noop::id())
            .compression_program(spl_account_compression::id())
            .system_program(system_program::id())
            .root(claim.root)
            .data_hash(claim.data_hash)
            .creator_hash(claim.creator_hash)
            .nonce(claim.nonce)
            .index(claim.index)
            .add_remaining_accounts(&proof_metas)
            .instruction()],
        Some(&config.fee_payer.pubkey()),
    );

    let latest_blockhash = config.rpc_client.get_latest_blockhash()?;
    let fee = config.rpc_client.get_fee_for_message(transaction.message())?;
    ensure_fee_payer_balance(config, fee)?;
    transaction.sign(&vec![config.fee_payer.as_ref()], latest_blockhash);
    send_transaction(config, transaction)?;
    Ok(())
}

fn command_delegate(config: &Config, asset_id: Pubkey, new_delegate: Pubkey) -> CommandResult {
    let (claim, proof_metas) = fetch_leaf_claim(config, &asset_id)?;
    if config.fee_payer.pubkey() != claim.owner {
        return Err(format!(
            "Fee payer {} is not the leaf owner {}",
            config.fee_payer.pubkey(),
            claim.owner
        )
        .into());
    }
    let (tree_authority, _) = find_tree_authority(&claim.tree);
    println!("Delegating {} to {}", asset_id, new_delegate);

    let mut transaction = Transaction::new_with_payer(
        &[DelegateBuilder::new()
            .tree_config(tree_authority)
            .leaf_owner(claim.owner)
            .previous_leaf_delegate(claim.delegate)
            .new_leaf_delegate(new_delegate)
            .merkle_tree(claim.tree)
            .log_wrapper(spl_noop::id())
            .compression_program(spl_account_compression::id())
            .system_program(system_program::id())
            .root(claim.root)
            .data_hash(claim.data_hash)
            .creator_hash(claim.creator_hash)
            .nonce(claim.nonce)
            .index(claim.index)
            .add_remaining_accounts(&proof_metas)
            .instruction()],
        Some(&config.fee_payer.pubkey()),
    );

    let latest_blockhash = config.rpc_client.get_latest_blockhash()?;
    let fee = config.rpc_client.get_fee_for_message(transaction.message())?;
    ensure_fee_payer_balance(config, fee)?;
    transaction.sign(&vec![config.fee_payer.as_ref()], latest_blockhash);
    send_transaction(config, transaction)?;
    Ok(())
}

fn command_burn(config: &Config, asset_id: Pubkey) -> CommandResult {
    let (claim, proof_metas) = fetch_leaf_claim(config, &asset_id)?;
    let signer = config.fee_payer.pubkey();
    let role = leaf_signer_role(&claim, &signer)?;
    let (tree_authority, _) = find_tree_authority(&claim.tree);
    println!("Burning {}", asset_id);

    let mut transaction = Transaction::new_with_payer(
        &[BurnBuilder::new()
            .tree_config(tree_authority)
            .leaf_owner(claim.owner, matches!(role, LeafSigner::Owner))
            .leaf_delegate(claim.delegate, matches!(role, LeafSigner::Delegate))
            .merkle_tree(claim.tree)
            .log_wrapper(spl_noop::id())
            .compression_program(spl_account_compression::id())
            .system_program(system_program::id())
            .root(claim.root)
            .data_hash(claim.data_hash)
            .creator_hash(claim.creator_hash)
            .nonce(claim.nonce)
            .index(claim.index)
            .add_remaining_accounts(&proof_metas)
            .instruction()],
        Some(&config.fee_payer.pubkey()),
    );

    let latest_blockhash = config.rpc_client.get_latest_blockhash()?;
    let fee = config.rpc_client.get_fee_for_message(transaction.message())?;
    ensure_fee_payer_balance(config, fee)?;
    transaction.sign(&vec![config.fee_payer.as_ref()], latest_blockhash);
    send_transaction(config, transaction)?;
    Ok(())
}

fn command_show_asset(config: &Config, asset_id: Pubkey) -> CommandResult {
    let asset = config.read_api.get_asset(&asset_id)?;
    println!("Asset {}", asset.id);
    if let Some(interface) = &asset.interface {
        println!("  interface: {}", interface);
    }
    if let Some(content) = &asset.content {
        if let Some(metadata) = &content.metadata {
            println!("  name: {}", metadata.name.as_deref().unwrap_or("-"));
            println!("  symbol: {}", metadata.symbol.as_deref().unwrap_or("-"));
        }
        println!("  uri: {}", content.json_uri.as_deref().unwrap_or("-"));
    }
    println!("  owner: {}", asset.ownership.owner);
    if let Some(delegate) = &asset.ownership.delegate {
        println!("  delegate: {}", delegate);
    }
    println!("  tree: {}", asset.compression.tree);
    println!("  leaf index: {}", asset.compression.leaf_id);
    if let Some(royalty) = &asset.royalty {
        println!("  royalty basis points: {}", royalty.basis_points);
    }
    if asset.burnt {
        println!("  burnt");
    }
    Ok(())
}

fn command_list_assets(config: &Config, owner: Pubkey) -> CommandResult {
    const PAGE_LIMIT: u64 = 100;
    let mut page = 1;
    let mut shown = 0;
    loop {
        let list = config.read_api.get_assets_by_owner(&owner, page, PAGE_LIMIT)?;
        if page == 1 && list.items.is_empty() {
            println!("No assets found for {}", owner);
            return Ok(());
        }
        for asset in &list.items {
            let name = asset
                .content
                .as_ref()
                .and_then(|content| content.metadata.as_ref())
                .and_then(|metadata| metadata.name.clone())
                .unwrap_or_else(|| "-".to_string());
            println!("{}  {}", asset.id, name);
        }
        shown += list.items.len() as u64;
        if list.items.is_empty() || shown >= list.total {
            break;
        }
        page += 1;
    }
    Ok(())
}

fn command_show_tree(config: &Config, merkle_tree: Pubkey) -> CommandResult {
    let account = config.rpc_client.get_account(&merkle_tree)?;
    if account.owner != spl_account_compression::id() {
        return Err(format!("Account {} is not a merkle tree account", merkle_tree).into());
    }
    let header = read_header(&account.data)?;
    let canopy_depth =
        canopy_depth_for_account(account.data.len(), header.max_depth, header.max_buffer_size)?;
    println!("Tree {}", merkle_tree);
    println!("  authority: {}", header.authority);
    println!("  max depth: {}", header.max_depth);
    println!("  max buffer size: {}", header.max_buffer_size);
    println!("  canopy depth: {}", canopy_depth);
    println!("  capacity: {} leaves", 1u64 << header.max_depth);
    if config.verbose {
        println!("  creation slot: {}", header.creation_slot);
        println!("  account size: {} bytes", account.data.len());
    }
    Ok(())
}

fn parse_creator_spec(value: &str) -> Result<Creator, String> {
    let (address, share) = value
        .split_once(':')
        .ok_or_else(|| format!("Creator '{}' is not of the form PUBKEY:SHARE", value))?;
    let address =
        Pubkey::from_str(address).map_err(|err| format!("Invalid creator address: {}", err))?;
    let share = share
        .parse::<u8>()
        .map_err(|err| format!("Invalid creator share: {}", err))?;
    Ok(Creator {
        address,
        verified: false,
        share,
    })
}

fn is_creator_spec(value: String) -> Result<(), String> {
    parse_creator_spec(&value).map(|_| ())
}

fn main() {
    solana_logger::setup_with_default("solana=info");

    let matches = App::new(crate_name!())
        .about(crate_description!())
        .version(crate_version!())
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg({
            let arg = Arg::with_name("config_file")
                .short("C")
                .long("config")
                .value_name("PATH")
                .takes_value(true)
                .global(true)
                .help("Configuration file to use");
            if let Some(ref config_file) = *solana_cli_config::CONFIG_FILE {
                arg.default_value(config_file)
            } else {
                arg
            }
        })
        .arg(
            Arg::with_name("json_rpc_url")
                .long("url")
                .value_name("URL")
                .takes_value(true)
                .global(true)
                .validator(is_url)
                .help("JSON RPC URL for the cluster.  Default from the configuration file."),
        )
        .arg(
            Arg::with_name("read_api_url")
                .long("read-api-url")
                .value_name("URL")
                .takes_value(true)
                .global(true)
                .validator(is_url)
                .help("URL of a read-API (DAS) provider.  Defaults to the JSON RPC URL."),
        )
        .arg(fee_payer_arg().short("p").global(true))
        .arg(
            Arg::with_name("verbose")
                .long("verbose")
                .short("v")
                .takes_value(false)
                .global(true)
                .help("Show additional information"),
        )
        .arg(
            Arg::with_name("dry_run")
                .long("dry-run")
                .takes_value(false)
                .global(true)
                .help("Simulate transaction instead of executing"),
        )
        .arg(
            Arg::with_name("airdrop")
                .long("airdrop")
                .takes_value(false)
                .global(true)
                .help("Request an airdrop when the fee payer balance is insufficient"),
        )
        .subcommand(
            SubCommand::with_name("create-tree")
                .about("Create a new merkle tree for compressed NFTs")
                .arg(
                    Arg::with_name("max_depth")
                        .long("max-depth")
                        .validator(is_parsable::<u32>)
                        .value_name("INTEGER")
                        .takes_value(true)
                        .default_value("14")
                        .help("Tree depth; the tree holds up to 2^depth leaves"),
                )
                .arg(
                    Arg::with_name("max_buffer_size")
                        .long("max-buffer-size")
                        .validator(is_parsable::<u32>)
                        .value_name("INTEGER")
                        .takes_value(true)
                        .default_value("64")
                        .help("Size of the concurrent change-log buffer"),
                )
                .arg(
                    Arg::with_name("canopy_depth")
                        .long("canopy-depth")
                        .validator(is_parsable::<u32>)
                        .value_name("INTEGER")
                        .takes_value(true)
                        .default_value("0")
                        .help("Number of proof levels to cache on-chain"),
                )
                .arg(
                    Arg::with_name("public")
                        .long("public")
                        .takes_value(false)
                        .help("Allow anyone to mint into the tree"),
                )
                .arg(
                    Arg::with_name("tree_keypair")
                        .long("tree-keypair")
                        .validator(is_keypair)
                        .value_name("KEYPAIR")
                        .takes_value(true)
                        .help("Keypair of the tree account.  Defaults to a new keypair"),
                ),
        )
        .subcommand(
            SubCommand::with_name("mint")
                .about("Mint a compressed NFT into a tree")
                .arg(
                    Arg::with_name("tree")
                        .long("tree")
                        .validator(is_pubkey)
                        .value_name("PUBKEY")
                        .takes_value(true)
                        .required(true)
                        .help("Merkle tree to mint into"),
                )
                .arg(
                    Arg::with_name("name")
                        .long("name")
                        .value_name("STRING")
                        .takes_value(true)
                        .required(true)
                        .help("NFT name, at most 32 bytes"),
                )
                .arg(
                    Arg::with_name("symbol")
                        .long("symbol")
                        .value_name("STRING")
                        .takes_value(true)
                        .default_value("")
                        .help("NFT symbol, at most 10 bytes"),
                )
                .arg(
                    Arg::with_name("uri")
                        .long("uri")
                        .value_name("URL")
                        .takes_value(true)
                        .required(true)
                        .help("URI of the off-chain metadata JSON, at most 200 bytes"),
                )
                .arg(
                    Arg::with_name("owner")
                        .long("owner")
                        .validator(is_pubkey)
                        .value_name("PUBKEY")
                        .takes_value(true)
                        .help("Owner of the minted NFT.  Defaults to the fee payer"),
                )
                .arg(
                    Arg::with_name("seller_fee_basis_points")
                        .long("seller-fee-basis-points")
                        .validator(is_parsable::<u16>)
                        .value_name("INTEGER")
                        .takes_value(true)
                        .default_value("0")
                        .help("Royalty in basis points: [0, 10000]"),
                )
                .arg(
                    Arg::with_name("creator")
                        .long("creator")
                        .validator(is_creator_spec)
                        .value_name("PUBKEY:SHARE")
                        .takes_value(true)
                        .multiple(true)
                        .help("Creator and its royalty share.  Defaults to the fee payer with share 100"),
                ),
        )
        .subcommand(
            SubCommand::with_name("transfer")
                .about("Transfer a compressed NFT to a new owner")
                .arg(
                    Arg::with_name("asset_id")
                        .long("asset-id")
                        .validator(is_pubkey)
                        .value_name("PUBKEY")
                        .takes_value(true)
                        .required(true)
                        .help("Asset id of the NFT"),
                )
                .arg(
                    Arg::with_name("new_owner")
                        .long("new-owner")
                        .validator(is_pubkey)
                        .value_name("PUBKEY")
                        .takes_value(true)
                        .required(true)
                        .help("Recipient of the NFT"),
                ),
        )
        .subcommand(
            SubCommand::with_name("delegate")
                .about("Approve a delegate for a compressed NFT")
                .arg(
                    Arg::with_name("asset_id")
                        .long("asset-id")
                        .validator(is_pubkey)
                        .value_name("PUBKEY")
                        .takes_value(true)
                        .required(true)
                        .help("Asset id of the NFT"),
                )
                .arg(
                    Arg::with_name("delegate")
                        .long("delegate")
                        .validator(is_pubkey)
                        .value_name("PUBKEY")
                        .takes_value(true)
                        .required(true)
                        .help("New leaf delegate"),
                ),
        )
        .subcommand(
            SubCommand::with_name("burn")
                .about("Burn a compressed NFT")
                .arg(
                    Arg::with_name("asset_id")
                        .long("asset-id")
                        .validator(is_pubkey)
                        .value_name("PUBKEY")
                        .takes_value(true)
                        .required(true)
                        .help("Asset id of the NFT"),
                ),
        )
        .subcommand(
            SubCommand::with_name("asset")
                .about("Display a compressed NFT from the read API")
                .arg(
                    Arg::with_name("asset_id")
                        .long("asset-id")
                        .validator(is_pubkey)
                        .value_name("PUBKEY")
                        .takes_value(true)
                        .required(true)
                        .help("Asset id of the NFT"),
                ),
        )
        .subcommand(
            SubCommand::with_name("assets")
                .about("List the compressed NFTs owned by a wallet")
                .arg(
                    Arg::with_name("owner")
                        .long("owner")
                        .validator(is_pubkey)
                        .value_name("PUBKEY")
                        .takes_value(true)
                        .help("Owner to list assets for.  Defaults to the fee payer"),
                ),
        )
        .subcommand(
            SubCommand::with_name("show-tree")
                .about("Display an on-chain merkle tree account")
                .arg(
                    Arg::with_name("tree")
                        .long("tree")
                        .validator(is_pubkey)
                        .value_name("PUBKEY")
                        .takes_value(true)
                        .required(true)
                        .help("Merkle tree account"),
                ),
        )
        .get_matches();

    let mut wallet_manager = None;
    let config = {
        let cli_config = if let Some(config_file) = matches.value_of("config_file") {
            solana_cli_config::Config::load(config_file).unwrap_or_default()
        } else {
            solana_cli_config::Config::default()
        };
        let json_rpc_url = value_t!(matches, "json_rpc_url", String)
            .unwrap_or_else(|_| cli_config.json_rpc_url.clone());
        let read_api_url =
            value_t!(matches, "read_api_url", String).unwrap_or_else(|_| json_rpc_url.clone());

        let fee_payer = signer_from_path(
            &matches,
            matches
                .value_of("fee_payer")
                .unwrap_or(&cli_config.keypair_path),
            "fee_payer",
            &mut wallet_manager,
        )
        .unwrap_or_else(|e| {
            eprintln!("error: {}", e);
            exit(1);
        });

        let verbose = matches.is_present("verbose");
        let dry_run = matches.is_present("dry_run");
        let airdrop = matches.is_present("airdrop");

        Config {
            rpc_client: RpcClient::new_with_commitment(json_rpc_url, CommitmentConfig::confirmed()),
            read_api: ReadApiClient::new(&read_api_url),
            fee_payer,
            verbose,
            dry_run,
            airdrop,
        }
    };

    let _ = match matches.subcommand() {
        ("create-tree", Some(arg_matches)) => {
            let max_depth = value_of(arg_matches, "max_depth").unwrap();
            let max_buffer_size = value_of(arg_matches, "max_buffer_size").unwrap();
            let canopy_depth = value_of(arg_matches, "canopy_depth").unwrap();
            let public = arg_matches.is_present("public");
            let tree_keypair = keypair_of(arg_matches, "tree_keypair").unwrap_or_else(Keypair::new);

            match TreeGeometry::new(max_depth, max_buffer_size, canopy_depth) {
                Ok(geometry) => command_create_tree(&config, geometry, public, tree_keypair),
                Err(err) => Err(err.into()),
            }
        }
        ("mint", Some(arg_matches)) => {
            let merkle_tree = pubkey_of(arg_matches, "tree").unwrap();
            let name = arg_matches.value_of("name").unwrap().to_string();
            let symbol = arg_matches.value_of("symbol").unwrap().to_string();
            let uri = arg_matches.value_of("uri").unwrap().to_string();
            let seller_fee_basis_points =
                value_of(arg_matches, "seller_fee_basis_points").unwrap();
            let owner =
                pubkey_of(arg_matches, "owner").unwrap_or_else(|| config.fee_payer.pubkey());
            let creators = match arg_matches.values_of("creator") {
                Some(values) => values
                    .map(|value| parse_creator_spec(value).unwrap())
                    .collect(),
                None => vec![Creator {
                    address: config.fee_payer.pubkey(),
                    verified: false,
                    share: 100,
                }],
            };

            command_mint(
                &config,
                merkle_tree,
                owner,
                build_metadata_args(name, symbol, uri, seller_fee_basis_points, creators),
            )
        }
        ("transfer", Some(arg_matches)) => {
            let asset_id = pubkey_of(arg_matches, "asset_id").unwrap();
            let new_owner = pubkey_of(arg_matches, "new_owner").unwrap();
            command_transfer(&config, asset_id, new_owner)
        }
        ("delegate", Some(arg_matches)) => {
            let asset_id = pubkey_of(arg_matches, "asset_id").unwrap();
            let new_delegate = pubkey_of(arg_matches, "delegate").unwrap();
            command_delegate(&config, asset_id, new_delegate)
        }
        ("burn", Some(arg_matches)) => {
            let asset_id = pubkey_of(arg_matches, "asset_id").unwrap();
            command_burn(&config, asset_id)
        }
        ("asset", Some(arg_matches)) => {
            let asset_id = pubkey_of(arg_matches, "asset_id").unwrap();
            command_show_asset(&config, asset_id)
        }
        ("assets", Some(arg_matches)) => {
            let owner =
                pubkey_of(arg_matches, "owner").unwrap_or_else(|| config.fee_payer.pubkey());
            command_list_assets(&config, owner)
        }
        ("show-tree", Some(arg_matches)) => {
            let merkle_tree = pubkey_of(arg_matches, "tree").unwrap();
            command_show_tree(&config, merkle_tree)
        }
        _ => unreachable!(),
    }
    .map_err(|err| {
        eprintln!("{}", err);
        exit(1);
    });
}
